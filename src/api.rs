use crate::config::Config;
use crate::contacts::{ChromosomeMap, IngestParams, Triple};
use crate::convert::{convert, ContactStats, ConversionParams};
use crate::consts::DEFAULT_CONVERT_FACTOR;
use crate::core_types::{CancelToken, GenomicPos};
use crate::error::FoldResult;
use crate::optimizer::{Reconstructor, RunOptions, RunSummary, SnapshotSink};
use crate::potential::PotentialKind;
use crate::search::{ConversionSearch, SearchOptions, Selection, TrialResult};
use crate::structure::Structure;
use serde::Serialize;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

/// Everything an external writer needs to emit models and logs.
#[derive(Debug, Clone, Serialize)]
pub struct Reconstruction {
    /// Dense locus id -> original genomic position.
    pub positions: Vec<GenomicPos>,
    pub chromosomes: ChromosomeMap,
    pub convert_factor: f64,
    pub stats: ContactStats,
    /// Empty unless the factor was searched.
    pub trials: Vec<TrialResult>,
    pub selection: Option<Selection>,
    pub summary: RunSummary,
}

#[derive(TypedBuilder)]
pub struct ReconstructRequest<'a> {
    pub triples: Vec<Triple>,
    #[builder(default)]
    pub config: Config,
    /// Start every model from these coordinates (3 per locus).
    #[builder(default, setter(strip_option))]
    pub initial_structure: Option<Vec<f64>>,
    #[builder(default)]
    pub cancel: CancelToken,
    #[builder(default, setter(strip_option))]
    pub sink: Option<&'a dyn SnapshotSink>,
}

impl ReconstructRequest<'_> {
    pub fn run(self) -> FoldResult<Reconstruction> {
        let cfg = &self.config;
        cfg.validate()?;

        let map = IngestParams::builder()
            .triples(self.triples)
            .chr_lens(cfg.model.chr_lens.clone())
            .contact_threshold(cfg.model.contact_threshold)
            .build()
            .build_contact_map()?;

        if let Some(coords) = &self.initial_structure {
            Structure::from_coords(coords.clone(), map.n_loci())?;
        }

        if cfg.model.inequality_constraints && cfg.model.potential != PotentialKind::LorentzianInequality {
            warn!(
                "⚠️  Inequality constraints are only used by the {} potential; '{}' ignores them",
                PotentialKind::LorentzianInequality,
                cfg.model.potential
            );
        }

        let mut run_opts = RunOptions::from(cfg);
        run_opts.initial_structure = self.initial_structure;
        let conversion = ConversionParams {
            convert_factor: cfg.model.convert_factor.unwrap_or(DEFAULT_CONVERT_FACTOR),
            adjacency: cfg.model.adjacency,
            inequality_constraints: cfg.model.inequality_constraints,
        };

        info!(
            "🚀 Reconstructing {} loci with {} potential, {} model(s), {} gradient worker(s)",
            map.n_loci(),
            cfg.model.potential,
            run_opts.models,
            run_opts.threads
        );

        let (stats, trials, selection, summary) = match cfg.model.convert_factor {
            Some(_) => {
                let set = convert(&map, &conversion)?;
                let summary = Reconstructor::new(&set, run_opts)?.run(&self.cancel, self.sink)?;
                (set.stats, Vec::new(), None, summary)
            }
            None => {
                let outcome = ConversionSearch::new(&map, conversion, run_opts, SearchOptions::from(cfg))
                    .run(&self.cancel, self.sink)?;
                (
                    outcome.stats,
                    outcome.trials,
                    Some(outcome.selection),
                    outcome.final_run,
                )
            }
        };

        Ok(Reconstruction {
            convert_factor: summary.convert_factor,
            positions: map.positions().to_vec(),
            chromosomes: map.chromosomes().clone(),
            stats,
            trials,
            selection,
            summary,
        })
    }
}

/// Ingest, convert (or sweep for the factor), and reconstruct.
pub fn reconstruct(
    triples: Vec<Triple>,
    config: &Config,
    cancel: &CancelToken,
    sink: Option<&dyn SnapshotSink>,
) -> FoldResult<Reconstruction> {
    ReconstructRequest {
        triples,
        config: config.clone(),
        initial_structure: None,
        cancel: cancel.clone(),
        sink,
    }
    .run()
}
