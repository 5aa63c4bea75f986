use crate::consts::{
    CONVERT_FACTOR_STEP, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATION, DEFAULT_NUM_MODELS,
    END_CONVERT_FACTOR, START_CONVERT_FACTOR, TEMP_NUM, TRIAL_MAX_ITERATION,
};
use crate::convert::AdjacencyMode;
use crate::error::{FoldError, FoldResult};
use crate::potential::PotentialKind;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub model: ModelParams,
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Exponent of the IF -> distance conversion. Unset runs the sweep.
    #[arg(long)]
    pub convert_factor: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_NUM_MODELS)]
    pub models: usize,
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATION)]
    pub max_iterations: usize,
    /// Gradient workers; 0 picks twice the core count.
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    #[arg(long, value_enum, default_value_t = PotentialKind::Lorentzian)]
    pub potential: PotentialKind,
    #[arg(long, value_enum, default_value_t = AdjacencyMode::Boost)]
    pub adjacency: AdjacencyMode,
    /// Zoom exported structures back by the conversion scale factor.
    #[arg(long, default_value_t = false)]
    pub keep_original_scale: bool,
    #[arg(long, default_value_t = false)]
    pub inequality_constraints: bool,
    /// Pairs closer than this many loci are left out of the correlations.
    #[arg(long, default_value_t = 0)]
    pub exclusion_interval: usize,
    #[arg(long, default_value_t = 0.0)]
    pub contact_threshold: f64,
    /// Loci per chromosome, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub chr_lens: Option<Vec<usize>>,
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            convert_factor: None,
            models: DEFAULT_NUM_MODELS,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATION,
            threads: 0,
            potential: PotentialKind::Lorentzian,
            adjacency: AdjacencyMode::Boost,
            keep_original_scale: false,
            inequality_constraints: false,
            exclusion_interval: 0,
            contact_threshold: 0.0,
            chr_lens: None,
            seed: None,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = START_CONVERT_FACTOR)]
    pub search_start: f64,
    #[arg(long, default_value_t = END_CONVERT_FACTOR)]
    pub search_end: f64,
    #[arg(long, default_value_t = CONVERT_FACTOR_STEP)]
    pub search_step: f64,
    #[arg(long, default_value_t = TEMP_NUM)]
    pub trial_models: usize,
    #[arg(long, default_value_t = TRIAL_MAX_ITERATION)]
    pub trial_max_iterations: usize,
    /// Run sweep trials one after another instead of in a pool.
    #[arg(long, default_value_t = false)]
    pub serial_search: bool,
    /// Concurrent sweep trials; 0 picks the core count.
    #[arg(long, default_value_t = 0)]
    pub pool_size: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_start: START_CONVERT_FACTOR,
            search_end: END_CONVERT_FACTOR,
            search_step: CONVERT_FACTOR_STEP,
            trial_models: TEMP_NUM,
            trial_max_iterations: TRIAL_MAX_ITERATION,
            serial_search: false,
            pool_size: 0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FoldResult<Self> {
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FoldResult<()> {
        let m = &self.model;
        let s = &self.search;

        fn positive(name: &str, v: f64) -> FoldResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(FoldError::Config(format!("{} must be positive, got {}", name, v)))
            }
        }
        fn nonzero(name: &str, v: usize) -> FoldResult<()> {
            if v > 0 {
                Ok(())
            } else {
                Err(FoldError::Config(format!("{} must be at least 1", name)))
            }
        }

        if let Some(cf) = m.convert_factor {
            positive("convert_factor", cf)?;
        }
        positive("learning_rate", m.learning_rate)?;
        nonzero("models", m.models)?;
        nonzero("max_iterations", m.max_iterations)?;
        if !m.contact_threshold.is_finite() {
            return Err(FoldError::Config("contact_threshold must be finite".into()));
        }

        positive("search_start", s.search_start)?;
        positive("search_step", s.search_step)?;
        if !(s.search_end.is_finite() && s.search_end >= s.search_start) {
            return Err(FoldError::Config(format!(
                "search_end ({}) must not be below search_start ({})",
                s.search_end, s.search_start
            )));
        }
        nonzero("trial_models", s.trial_models)?;
        nonzero("trial_max_iterations", s.trial_max_iterations)?;
        Ok(())
    }
}
