pub mod report;

use crate::config::Config;
use crate::consts::{DEFAULT_CONVERT_FACTOR, MAX_NUM_THREAD, SELECTION_TOLERANCE, WORST_CORRELATION};
use crate::contacts::ContactMap;
use crate::convert::{convert, ContactStats, ConversionParams};
use crate::core_types::CancelToken;
use crate::error::{FoldError, FoldResult};
use crate::optimizer::{Reconstructor, RunOptions, RunSummary, SnapshotSink};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub trial_models: usize,
    pub trial_max_iterations: usize,
    pub serial: bool,
    /// Concurrent trials; 0 picks the core count.
    pub pool_size: usize,
}

impl From<&Config> for SearchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            start: cfg.search.search_start,
            end: cfg.search.search_end,
            step: cfg.search.search_step,
            trial_models: cfg.search.trial_models,
            trial_max_iterations: cfg.search.trial_max_iterations,
            serial: cfg.search.serial_search,
            pool_size: cfg.search.pool_size,
        }
    }
}

/// Averaged result of the trial run at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    pub convert_factor: f64,
    /// Mean Spearman(IF, distance); `None` when every trial model failed.
    pub correlation: Option<f64>,
    pub mean_rmse: f64,
    pub models_ok: usize,
    pub models_failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub convert_factor: f64,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub trials: Vec<TrialResult>,
    pub selection: Selection,
    pub stats: ContactStats,
    pub final_run: RunSummary,
}

/// `start, start + step, ...` up to and including `end`.
pub fn conversion_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let slack = step * 1e-9;
    (0..)
        .map(|k| start + k as f64 * step)
        .take_while(|&v| v <= end + slack)
        .collect()
}

/// Keeps the factor with the lowest mean correlation. Scores within
/// `SELECTION_TOLERANCE` of the current best count as tied and go to the
/// smaller factor. Trials without a score are skipped.
pub fn select_best(trials: &[TrialResult]) -> Selection {
    let mut min_cor = WORST_CORRELATION;
    let mut best = DEFAULT_CONVERT_FACTOR;

    for t in trials {
        let Some(cor) = t.correlation else {
            continue;
        };
        let cf = t.convert_factor;
        if min_cor - cor > SELECTION_TOLERANCE
            || ((cor - min_cor).abs() < SELECTION_TOLERANCE && best > cf)
        {
            min_cor = cor;
            best = cf;
        }
    }

    Selection {
        convert_factor: best,
        correlation: min_cor,
    }
}

/// Sweeps the conversion exponent with cheap trial runs, then reconstructs
/// at the winner with the full run options.
pub struct ConversionSearch<'a> {
    map: &'a ContactMap,
    conversion: ConversionParams,
    run: RunOptions,
    options: SearchOptions,
}

impl<'a> ConversionSearch<'a> {
    /// `conversion` supplies everything but the factor, which the sweep sets.
    pub fn new(
        map: &'a ContactMap,
        conversion: ConversionParams,
        run: RunOptions,
        options: SearchOptions,
    ) -> Self {
        Self {
            map,
            conversion,
            run,
            options,
        }
    }

    fn trial(&self, cf: f64, cancel: &CancelToken) -> FoldResult<TrialResult> {
        if cancel.is_cancelled() {
            return Err(FoldError::Cancelled);
        }

        let set = convert(
            self.map,
            &ConversionParams {
                convert_factor: cf,
                ..self.conversion
            },
        )?;
        let opts = self
            .run
            .for_trial(self.options.trial_models, self.options.trial_max_iterations);

        match Reconstructor::new(&set, opts)?.run(cancel, None) {
            Ok(summary) if summary.cancelled => Err(FoldError::Cancelled),
            Ok(summary) => {
                debug!(
                    "Trial {:.2}: correlation {:.4} over {} model(s)",
                    cf,
                    summary.mean_spearman_if,
                    summary.models.len()
                );
                Ok(TrialResult {
                    convert_factor: cf,
                    correlation: Some(summary.mean_spearman_if),
                    mean_rmse: summary.mean_rmse,
                    models_ok: summary.models.len(),
                    models_failed: summary.failures.len(),
                })
            }
            Err(FoldError::NoSuccessfulModels { .. }) => {
                warn!("⚠️  Every trial model failed at factor {:.2}; skipping", cf);
                Ok(TrialResult {
                    convert_factor: cf,
                    correlation: None,
                    mean_rmse: f64::NAN,
                    models_ok: 0,
                    models_failed: self.options.trial_models,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn pool_size(&self, grid_len: usize) -> usize {
        if self.options.pool_size > 0 {
            return self.options.pool_size.min(MAX_NUM_THREAD);
        }
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        cores.min(grid_len).clamp(1, MAX_NUM_THREAD)
    }

    /// Runs every grid point. Results come back in grid order.
    pub fn sweep(&self, cancel: &CancelToken) -> FoldResult<Vec<TrialResult>> {
        let o = &self.options;
        let grid = conversion_grid(o.start, o.end, o.step);
        if grid.is_empty() {
            return Err(FoldError::Config(format!(
                "empty conversion grid [{}, {}] step {}",
                o.start, o.end, o.step
            )));
        }

        info!(
            "🔍 Searching conversion factor over {} point(s) in [{:.2}, {:.2}]",
            grid.len(),
            o.start,
            o.end
        );

        if o.serial {
            grid.iter().map(|&cf| self.trial(cf, cancel)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.pool_size(grid.len()))
                .build()?;
            pool.install(|| grid.par_iter().map(|&cf| self.trial(cf, cancel)).collect())
        }
    }

    pub fn run(&self, cancel: &CancelToken, sink: Option<&dyn SnapshotSink>) -> FoldResult<SearchOutcome> {
        let trials = self.sweep(cancel)?;
        let selection = select_best(&trials);

        info!(
            "Conversion factor sweep:\n{}",
            report::sweep_table(&trials, selection.convert_factor)
        );
        info!(
            "✅ Best convert factor: {:.2} (avg. correlation {:.4})",
            selection.convert_factor, selection.correlation
        );

        let set = convert(
            self.map,
            &ConversionParams {
                convert_factor: selection.convert_factor,
                ..self.conversion
            },
        )?;
        let final_run = Reconstructor::new(&set, self.run.clone())?.run(cancel, sink)?;

        Ok(SearchOutcome {
            trials,
            selection,
            stats: set.stats,
            final_run,
        })
    }
}
