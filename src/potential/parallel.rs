use crate::consts::MAX_NUM_THREAD;
use crate::convert::ContactSet;
use crate::error::{FoldError, FoldResult};
use crate::optimizer::Objective;
use crate::potential::{EvalContext, PotentialKind};
use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

/// `0` means auto: twice the core count, capped at `MAX_NUM_THREAD`.
pub fn resolve_threads(requested: usize) -> usize {
    if requested > 0 {
        return requested.min(MAX_NUM_THREAD);
    }
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (2 * cores).min(MAX_NUM_THREAD)
}

/// Splits `0..total` into at most `k` contiguous, near-equal ranges.
pub fn partition_ranges(total: usize, k: usize) -> Vec<Range<usize>> {
    let k = k.clamp(1, total.max(1));
    let base = total / k;
    let extra = total % k;

    let mut ranges = Vec::with_capacity(k);
    let mut start = 0;
    for w in 0..k {
        let len = base + usize::from(w < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Evaluates a potential over a contact set, one contiguous constraint range
/// per worker. Partials are reduced in range order, so a given worker count
/// always produces bit-identical results.
pub struct ParallelEvaluator<'a> {
    ctx: EvalContext<'a>,
    kind: PotentialKind,
    ranges: Vec<Range<usize>>,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> ParallelEvaluator<'a> {
    pub fn new(set: &'a ContactSet, kind: PotentialKind, threads: usize) -> FoldResult<Self> {
        let ranges = partition_ranges(set.constraints.len(), threads);
        let pool = if ranges.len() > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(ranges.len())
                    .build()?,
            )
        } else {
            None
        };

        debug!(
            "Gradient evaluator: {} worker(s) over {} constraints ({})",
            ranges.len(),
            set.constraints.len(),
            kind
        );

        Ok(Self {
            ctx: EvalContext::new(set),
            kind,
            ranges,
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    pub fn kind(&self) -> PotentialKind {
        self.kind
    }

    pub fn context(&self) -> &EvalContext<'a> {
        &self.ctx
    }

    /// Cost at `x`; when `grad` is given it is overwritten with the gradient.
    pub fn evaluate(&self, x: &[f64], grad: Option<&mut [f64]>) -> FoldResult<f64> {
        let residual = if self.kind.needs_residual_pass() {
            let v = self.residual(x);
            if !(v.is_finite() && v > 0.0) {
                return Err(FoldError::NumericInstability {
                    pos1: 0,
                    pos2: 0,
                    detail: format!("residual sum is {}", v),
                });
            }
            v
        } else {
            0.0
        };

        let total = match &self.pool {
            None => self.evaluate_inline(x, residual, grad)?,
            Some(pool) => self.evaluate_pooled(pool, x, residual, grad)?,
        };
        Ok(self.kind.finish(&self.ctx, total))
    }

    fn residual(&self, x: &[f64]) -> f64 {
        match &self.pool {
            None => self.kind.residual_sum(&self.ctx, x, 0..self.ctx.constraints.len()),
            Some(pool) => {
                let parts: Vec<f64> = pool.install(|| {
                    self.ranges
                        .par_iter()
                        .map(|r| self.kind.residual_sum(&self.ctx, x, r.clone()))
                        .collect()
                });
                parts.iter().sum()
            }
        }
    }

    fn evaluate_inline(
        &self,
        x: &[f64],
        residual: f64,
        grad: Option<&mut [f64]>,
    ) -> FoldResult<f64> {
        let all = 0..self.ctx.constraints.len();
        match grad {
            Some(g) => {
                g.fill(0.0);
                self.kind.accumulate(&self.ctx, x, all, residual, Some(g))
            }
            None => self.kind.accumulate(&self.ctx, x, all, residual, None),
        }
    }

    fn evaluate_pooled(
        &self,
        pool: &rayon::ThreadPool,
        x: &[f64],
        residual: f64,
        grad: Option<&mut [f64]>,
    ) -> FoldResult<f64> {
        let want_grad = grad.is_some();
        let len = x.len();

        let partials: Vec<FoldResult<(f64, Vec<f64>)>> = pool.install(|| {
            self.ranges
                .par_iter()
                .map(|r| -> FoldResult<(f64, Vec<f64>)> {
                    let mut local = if want_grad { vec![0.0; len] } else { Vec::new() };
                    let buf = if want_grad {
                        Some(local.as_mut_slice())
                    } else {
                        None
                    };
                    let cost = self.kind.accumulate(&self.ctx, x, r.clone(), residual, buf)?;
                    Ok((cost, local))
                })
                .collect()
        });

        let mut total = 0.0;
        match grad {
            Some(g) => {
                g.fill(0.0);
                for part in partials {
                    let (cost, local) = part?;
                    total += cost;
                    for (acc, v) in g.iter_mut().zip(&local) {
                        *acc += v;
                    }
                }
            }
            None => {
                for part in partials {
                    total += part?.0;
                }
            }
        }
        Ok(total)
    }
}

impl Objective for ParallelEvaluator<'_> {
    fn value_and_gradient(&self, x: &[f64], grad: &mut [f64]) -> FoldResult<f64> {
        self.evaluate(x, Some(grad))
    }

    fn value(&self, x: &[f64]) -> FoldResult<f64> {
        self.evaluate(x, None)
    }
}
