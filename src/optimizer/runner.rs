use crate::config::Config;
use crate::convert::ContactSet;
use crate::core_types::CancelToken;
use crate::error::{FoldError, FoldResult};
use crate::optimizer::{AscentHooks, AscentOptions, GradientAscent, Objective, SnapshotSink};
use crate::potential::parallel::resolve_threads;
use crate::potential::{ParallelEvaluator, PotentialKind};
use crate::scorer::{score_model, ModelScore};
use crate::structure::Structure;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub models: usize,
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Already resolved; never 0.
    pub threads: usize,
    pub potential: PotentialKind,
    pub seed: Option<u64>,
    pub exclusion_interval: usize,
    pub keep_original_scale: bool,
    /// Keep final coordinates in the summary.
    pub keep_structures: bool,
    /// Start every model from these coordinates instead of a random cube.
    pub initial_structure: Option<Vec<f64>>,
}

impl From<&Config> for RunOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            models: cfg.model.models,
            learning_rate: cfg.model.learning_rate,
            max_iterations: cfg.model.max_iterations,
            threads: resolve_threads(cfg.model.threads),
            potential: cfg.model.potential,
            seed: cfg.model.seed,
            exclusion_interval: cfg.model.exclusion_interval,
            keep_original_scale: cfg.model.keep_original_scale,
            keep_structures: true,
            initial_structure: None,
        }
    }
}

impl RunOptions {
    /// Cheap variant used for each point of the conversion-factor sweep.
    pub fn for_trial(&self, models: usize, max_iterations: usize) -> Self {
        Self {
            models,
            max_iterations,
            threads: 1,
            keep_structures: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelOutcome {
    pub index: usize,
    pub score: ModelScore,
    pub iterations: usize,
    pub converged: bool,
    pub cost: f64,
    /// Final coordinates, zoomed when the original scale is kept.
    pub structure: Option<Structure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelFailure {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub convert_factor: f64,
    pub models: Vec<ModelOutcome>,
    pub failures: Vec<ModelFailure>,
    pub mean_rmse: f64,
    pub mean_spearman_if: f64,
    pub mean_spearman_dist: f64,
    pub mean_pearson_dist: f64,
    /// Cancellation cut the run short.
    pub cancelled: bool,
}

impl RunSummary {
    fn from_models(
        convert_factor: f64,
        models: Vec<ModelOutcome>,
        failures: Vec<ModelFailure>,
        cancelled: bool,
    ) -> Self {
        let n = models.len() as f64;
        let mean = |f: fn(&ModelScore) -> f64| models.iter().map(|m| f(&m.score)).sum::<f64>() / n;
        Self {
            convert_factor,
            mean_rmse: mean(|s| s.rmse),
            mean_spearman_if: mean(|s| s.spearman_if),
            mean_spearman_dist: mean(|s| s.spearman_dist),
            mean_pearson_dist: mean(|s| s.pearson_dist),
            models,
            failures,
            cancelled,
        }
    }
}

/// Produces N independent models for one conversion factor and averages
/// their scores. Failures local to one model are recorded, not escalated.
pub struct Reconstructor<'a> {
    set: &'a ContactSet,
    options: RunOptions,
}

impl<'a> Reconstructor<'a> {
    pub fn new(set: &'a ContactSet, options: RunOptions) -> FoldResult<Self> {
        if let Some(seed) = &options.initial_structure {
            Structure::from_coords(seed.clone(), set.n_loci())?;
        }
        Ok(Self { set, options })
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    fn starting_structure(&self, rng: &mut fastrand::Rng) -> FoldResult<Structure> {
        let n = self.set.n_loci();
        match &self.options.initial_structure {
            Some(coords) => Structure::from_coords(coords.clone(), n),
            None => Ok(Structure::random(n, rng, self.options.potential.default_cube())),
        }
    }

    pub fn run(&self, cancel: &CancelToken, sink: Option<&dyn SnapshotSink>) -> FoldResult<RunSummary> {
        let opts = &self.options;
        let evaluator = ParallelEvaluator::new(self.set, opts.potential, opts.threads)?;
        self.run_with(&evaluator, cancel, sink)
    }

    fn run_with<O: Objective + ?Sized>(
        &self,
        objective: &O,
        cancel: &CancelToken,
        sink: Option<&dyn SnapshotSink>,
    ) -> FoldResult<RunSummary> {
        let opts = &self.options;
        let cf = self.set.convert_factor;
        let ascent = GradientAscent::new(
            objective,
            AscentOptions {
                learning_rate: opts.learning_rate,
                max_iterations: opts.max_iterations,
                ..AscentOptions::default()
            },
        );
        let zoom = if opts.keep_original_scale {
            self.set.stats.scale_factor
        } else {
            1.0
        };

        let mut models = Vec::with_capacity(opts.models);
        let mut failures = Vec::new();
        let mut cancelled = false;

        for i in 0..opts.models {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let mut rng = match opts.seed.map(|s| s.wrapping_add(i as u64)) {
                Some(s) => fastrand::Rng::with_seed(s),
                None => fastrand::Rng::new(),
            };
            let mut structure = self.starting_structure(&mut rng)?;
            let hooks = AscentHooks {
                model: i,
                cancel: Some(cancel),
                sink,
            };

            let start = Instant::now();
            let outcome = match ascent.run(structure.coords_mut(), &hooks) {
                Ok(o) => o,
                Err(e) if e.is_model_local() => {
                    warn!("⚠️  Model {} (factor {:.2}) failed: {}", i, cf, e);
                    failures.push(ModelFailure {
                        index: i,
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let score = score_model(structure.coords(), &self.set.constraints, opts.exclusion_interval);
            info!(
                "🧬 Model {} (factor {:.2}): RMSE {:.4}, Spearman IF/dist {:.4}, {} iterations in {:.2?}",
                i,
                cf,
                score.rmse,
                score.spearman_if,
                outcome.iterations,
                start.elapsed()
            );

            models.push(ModelOutcome {
                index: i,
                score,
                iterations: outcome.iterations,
                converged: outcome.converged,
                cost: outcome.cost,
                structure: opts.keep_structures.then(|| structure.zoomed(zoom)),
            });

            if outcome.stopped {
                cancelled = true;
                break;
            }
        }

        if models.is_empty() {
            return Err(if cancelled {
                FoldError::Cancelled
            } else {
                FoldError::NoSuccessfulModels { convert_factor: cf }
            });
        }

        let summary = RunSummary::from_models(cf, models, failures, cancelled);
        info!(
            "📊 Factor {:.2}: {} model(s), {} failed, avg RMSE {:.4}, avg Spearman IF/dist {:.4}",
            cf,
            summary.models.len(),
            summary.failures.len(),
            summary.mean_rmse,
            summary.mean_spearman_if
        );
        Ok(summary)
    }
}
