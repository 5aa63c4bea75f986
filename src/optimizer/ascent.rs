use crate::consts::{DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATION, NEAR_ZERO, SNAPSHOT_EVERY, SNAPSHOT_WARMUP};
use crate::core_types::CancelToken;
use crate::error::FoldResult;
use crate::optimizer::line_search::{backtrack, step_into};
use crate::optimizer::{Objective, SnapshotSink};
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentOptions {
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Converged once `‖g‖ < tolerance · |cost|`.
    pub tolerance: f64,
    /// Smallest step the line search may try.
    pub step_floor: f64,
}

impl Default for AscentOptions {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATION,
            tolerance: NEAR_ZERO,
            step_floor: NEAR_ZERO,
        }
    }
}

/// Optional observers of a single ascent.
#[derive(Clone, Copy, Default)]
pub struct AscentHooks<'a> {
    pub model: usize,
    pub cancel: Option<&'a CancelToken>,
    pub sink: Option<&'a dyn SnapshotSink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AscentOutcome {
    pub iterations: usize,
    pub converged: bool,
    /// Interrupted by cancellation before convergence or the cap.
    pub stopped: bool,
    pub cost: f64,
    pub grad_norm: f64,
    pub step_size: f64,
    /// Cost after every accepted step, starting with the initial cost.
    pub cost_history: Vec<f64>,
}

pub fn should_snapshot(iteration: usize) -> bool {
    iteration < SNAPSHOT_WARMUP || iteration % SNAPSHOT_EVERY == 0
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|g| g * g).sum::<f64>().sqrt()
}

/// Gradient ascent with a reused step size. A stored step is kept while it
/// keeps the cost from dropping; otherwise the step is searched again from
/// the current point.
pub struct GradientAscent<'o, O: Objective + ?Sized> {
    objective: &'o O,
    options: AscentOptions,
}

impl<'o, O: Objective + ?Sized> GradientAscent<'o, O> {
    pub fn new(objective: &'o O, options: AscentOptions) -> Self {
        Self { objective, options }
    }

    /// Climbs from `x`, updating it in place.
    pub fn run(&self, x: &mut [f64], hooks: &AscentHooks) -> FoldResult<AscentOutcome> {
        let opts = &self.options;
        let len = x.len();
        let mut grad = vec![0.0; len];
        let mut trial = vec![0.0; len];
        let mut trial_grad = vec![0.0; len];

        let mut cost = self.objective.value_and_gradient(x, &mut grad)?;
        let mut history = vec![cost];
        let mut step: Option<f64> = None;
        let mut iterations = 0;
        let mut converged = false;
        let mut stopped = false;
        let mut grad_norm;

        loop {
            grad_norm = norm(&grad);
            if grad_norm < opts.tolerance * cost.abs() {
                converged = true;
                break;
            }
            if iterations >= opts.max_iterations {
                break;
            }
            if hooks.cancel.is_some_and(|c| c.is_cancelled()) {
                stopped = true;
                break;
            }
            iterations += 1;

            // 1. Reuse the last step if it does not lose ground
            let mut accepted = false;
            if let Some(alpha) = step {
                step_into(&mut trial, x, &grad, alpha);
                let f = self.objective.value_and_gradient(&trial, &mut trial_grad)?;
                if f >= cost {
                    x.copy_from_slice(&trial);
                    std::mem::swap(&mut grad, &mut trial_grad);
                    cost = f;
                    accepted = true;
                }
            }

            // 2. Otherwise search a new step from here
            if !accepted {
                let alpha = backtrack(
                    self.objective,
                    x,
                    &grad,
                    cost,
                    opts.learning_rate,
                    opts.step_floor,
                    &mut trial,
                )?;
                trace!("Model {} iteration {}: step size {:.3e}", hooks.model, iterations, alpha);
                step = Some(alpha);
                x.copy_from_slice(&trial);
                cost = self.objective.value_and_gradient(x, &mut grad)?;
            }

            history.push(cost);
            trace!(
                "Model {} iteration {}: cost {:.5}, |g| {:.7}",
                hooks.model,
                iterations,
                cost,
                norm(&grad)
            );

            if let Some(sink) = hooks.sink {
                if should_snapshot(iterations) && !sink.on_snapshot(hooks.model, iterations, cost, x) {
                    if let Some(c) = hooks.cancel {
                        c.cancel();
                    }
                    stopped = true;
                    grad_norm = norm(&grad);
                    break;
                }
            }
        }

        debug!(
            "Model {} finished after {} iteration(s): cost {:.5}, |g| {:.3e}, converged = {}",
            hooks.model, iterations, cost, grad_norm, converged
        );

        Ok(AscentOutcome {
            iterations,
            converged,
            stopped,
            cost,
            grad_norm,
            step_size: step.unwrap_or(0.0),
            cost_history: history,
        })
    }
}
