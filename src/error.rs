use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoldError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread Pool Error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Input Shape Error: {0}")]
    InputShape(String),

    #[error("Numeric Instability at constraint ({pos1}, {pos2}): {detail}")]
    NumericInstability {
        pos1: usize,
        pos2: usize,
        detail: String,
    },

    #[error("Line search exhausted (alpha = {alpha:e}); try a smaller learning rate")]
    LineSearchExhausted { alpha: f64 },

    #[error("Correlation Undefined: {0}")]
    CorrelationUndefined(String),

    #[error("Every model failed for conversion factor {convert_factor:.2}")]
    NoSuccessfulModels { convert_factor: f64 },

    #[error("Stop requested")]
    Cancelled,
}

impl FoldError {
    /// Errors that invalidate one trial model but not its siblings.
    pub fn is_model_local(&self) -> bool {
        matches!(
            self,
            FoldError::NumericInstability { .. } | FoldError::LineSearchExhausted { .. }
        )
    }
}

pub type FoldResult<T> = Result<T, FoldError>;
