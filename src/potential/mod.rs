pub mod parallel;

pub use parallel::ParallelEvaluator;

use crate::consts::WIDE_CURVE;
use crate::contacts::{ChromosomeMap, Constraint};
use crate::convert::ContactSet;
use crate::error::{FoldError, FoldResult};
use crate::structure::distance;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum_macros::{Display, EnumIter, EnumString};

/// Cost function maximized by the gradient ascent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PotentialKind {
    /// Log-likelihood of Gaussian residuals over all restraints.
    Quadratic,
    /// Saturating `IF·C / ((x-d)² + C)`; one outlier cannot dominate.
    #[default]
    Lorentzian,
    /// Lorentzian, plus a one-sided `tanh(d - x)` term for inequality rows.
    LorentzianInequality,
}

/// Everything a potential reads besides the coordinates.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub constraints: &'a [Constraint],
    pub chromosomes: &'a ChromosomeMap,
    pub max_if: f64,
    pub curve_width: f64,
    pub n_loci: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(set: &'a ContactSet) -> Self {
        Self {
            constraints: &set.constraints,
            chromosomes: &set.chromosomes,
            max_if: set.stats.max_if,
            curve_width: WIDE_CURVE,
            n_loci: set.n_loci(),
        }
    }

    /// Effective IF: every adjacent row weighs exactly `max_if`, so one
    /// outlier neighbour contact cannot dominate the gradient.
    #[inline(always)]
    fn weight(&self, c: &Constraint) -> f64 {
        if self.chromosomes.is_adjacent(c.pos1, c.pos2) {
            self.max_if
        } else {
            c.if_value
        }
    }
}

impl PotentialKind {
    /// Edge of the cube random starting structures are drawn from.
    pub fn default_cube(&self) -> f64 {
        match self {
            PotentialKind::Quadratic => 0.1,
            PotentialKind::Lorentzian | PotentialKind::LorentzianInequality => 1.0,
        }
    }

    /// The quadratic gradient depends on the residual sum over every row,
    /// so it needs a reduction pass before `accumulate`.
    pub fn needs_residual_pass(&self) -> bool {
        matches!(self, PotentialKind::Quadratic)
    }

    fn uses_row(&self, c: &Constraint) -> bool {
        !c.is_inequality || matches!(self, PotentialKind::LorentzianInequality)
    }

    /// Sum of `(x - d)²` over the rows in `range`.
    pub fn residual_sum(&self, ctx: &EvalContext, x: &[f64], range: Range<usize>) -> f64 {
        let mut v = 0.0;
        for c in &ctx.constraints[range] {
            if !self.uses_row(c) || ctx.weight(c) <= 0.0 {
                continue;
            }
            let r = distance(x, c.pos1, c.pos2) - c.dist;
            v += r * r;
        }
        v
    }

    /// Partial cost over `range`, adding the gradient into `grad` when given.
    /// For the quadratic potential `residual` must be the full residual sum and
    /// the returned partial is this range's share of it; `finish` turns the
    /// total into the cost.
    pub fn accumulate(
        &self,
        ctx: &EvalContext,
        x: &[f64],
        range: Range<usize>,
        residual: f64,
        mut grad: Option<&mut [f64]>,
    ) -> FoldResult<f64> {
        let n = ctx.n_loci as f64;
        let cw = ctx.curve_width;
        let mut partial = 0.0;

        for c in &ctx.constraints[range] {
            if !self.uses_row(c) {
                continue;
            }
            let w = ctx.weight(c);
            if w <= 0.0 {
                continue;
            }

            let (i, j) = (c.pos1, c.pos2);
            let dist = distance(x, i, j);
            let r = dist - c.dist;

            let (term, coeff) = match self {
                PotentialKind::Quadratic => (r * r, -n * r / (residual * dist)),
                PotentialKind::Lorentzian | PotentialKind::LorentzianInequality
                    if c.is_inequality =>
                {
                    let t = (c.dist - dist).tanh();
                    (w * t, -w * (1.0 - t * t) / dist)
                }
                PotentialKind::Lorentzian | PotentialKind::LorentzianInequality => {
                    let z = r * r;
                    let denom = z + cw;
                    (w * cw / denom, -w * cw * 2.0 * r / (denom * denom * dist))
                }
            };

            if !coeff.is_finite() || !term.is_finite() {
                return Err(FoldError::NumericInstability {
                    pos1: i,
                    pos2: j,
                    detail: format!(
                        "distance {:.6e}, target {:.6e}, coefficient {}",
                        dist, c.dist, coeff
                    ),
                });
            }
            partial += term;

            if let Some(g) = grad.as_deref_mut() {
                let (a, b) = (3 * i, 3 * j);
                for k in 0..3 {
                    let delta = coeff * (x[a + k] - x[b + k]);
                    g[a + k] += delta;
                    g[b + k] -= delta;
                }
            }
        }
        Ok(partial)
    }

    /// Turns the summed partials into the cost.
    pub fn finish(&self, ctx: &EvalContext, total: f64) -> f64 {
        match self {
            PotentialKind::Quadratic => {
                let n = ctx.n_loci as f64;
                -(n / 2.0) - n * (total / n).sqrt().ln()
            }
            _ => total,
        }
    }
}
