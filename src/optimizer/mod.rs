pub mod ascent;
pub mod line_search;
pub mod runner;

pub use ascent::{AscentHooks, AscentOptions, AscentOutcome, GradientAscent};
pub use runner::{ModelFailure, ModelOutcome, Reconstructor, RunOptions, RunSummary};

use crate::error::FoldResult;

/// A function the ascent maximizes. Both methods evaluate at `x`;
/// `value_and_gradient` overwrites `grad` with the gradient.
pub trait Objective {
    fn value_and_gradient(&self, x: &[f64], grad: &mut [f64]) -> FoldResult<f64>;
    fn value(&self, x: &[f64]) -> FoldResult<f64>;
}

/// Receives intermediate structures during an ascent.
pub trait SnapshotSink: Send + Sync {
    /// Return `false` to request that the reconstruction stop.
    fn on_snapshot(&self, model: usize, iteration: usize, cost: f64, coords: &[f64]) -> bool;
}
