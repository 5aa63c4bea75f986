pub mod correlation;

use crate::consts::WORST_CORRELATION;
use crate::contacts::Constraint;
use crate::error::FoldResult;
use crate::structure::distance;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelScore {
    pub rmse: f64,
    /// Spearman, raw IF vs reconstructed distance. The sweep objective.
    pub spearman_if: f64,
    /// Spearman, target vs reconstructed distance.
    pub spearman_dist: f64,
    /// Pearson, target vs reconstructed distance.
    pub pearson_dist: f64,
}

/// Root mean squared deviation between reconstructed and target distances
/// over the equality restraints.
pub fn rmse(x: &[f64], constraints: &[Constraint]) -> f64 {
    let (sum, count) = constraints
        .iter()
        .filter(|c| !c.is_inequality)
        .fold((0.0, 0usize), |(s, k), c| {
            let r = distance(x, c.pos1, c.pos2) - c.dist;
            (s + r * r, k + 1)
        });
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).sqrt()
}

/// Writes the reconstructed distance into each constraint's `str_dist`.
pub fn annotate_structure_distances(constraints: &mut [Constraint], x: &[f64]) {
    for c in constraints.iter_mut() {
        c.str_dist = Some(distance(x, c.pos1, c.pos2));
    }
}

fn or_worst(label: &str, result: FoldResult<f64>) -> f64 {
    result.unwrap_or_else(|e| {
        debug!("{} correlation replaced by {}: {}", label, WORST_CORRELATION, e);
        WORST_CORRELATION
    })
}

/// Scores one structure. Pairs closer than `exclusion_interval` loci are
/// left out of the correlations; undefined correlations become
/// `WORST_CORRELATION`.
pub fn score_model(x: &[f64], constraints: &[Constraint], exclusion_interval: usize) -> ModelScore {
    let mut observed = Vec::with_capacity(constraints.len());
    let mut ifs = Vec::with_capacity(constraints.len());
    let mut targets = Vec::with_capacity(constraints.len());

    for c in constraints {
        if c.is_inequality || c.span() < exclusion_interval || c.if_value <= 0.0 {
            continue;
        }
        observed.push(distance(x, c.pos1, c.pos2));
        ifs.push(c.if_value);
        targets.push(c.dist);
    }

    ModelScore {
        rmse: rmse(x, constraints),
        spearman_if: or_worst("IF/distance", correlation::spearman(&observed, &ifs)),
        spearman_dist: or_worst("target/distance", correlation::spearman(&observed, &targets)),
        pearson_dist: or_worst("target/distance (linear)", correlation::pearson(&observed, &targets)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<f64> {
        (0..n).flat_map(|i| [i as f64, 0.0, 0.0]).collect()
    }

    #[test]
    fn exact_distances_score_perfectly() {
        let x = line(4);
        let cons: Vec<Constraint> = [(0, 1), (0, 2), (1, 3), (0, 3)]
            .iter()
            .map(|&(i, j)| Constraint::new(i, j, 10.0 / (j - i) as f64).with_dist((j - i) as f64))
            .collect();
        let s = score_model(&x, &cons, 0);
        assert!(s.rmse.abs() < 1e-12);
        assert!((s.spearman_dist - 1.0).abs() < 1e-12);
        assert!((s.pearson_dist - 1.0).abs() < 1e-12);
        assert!((s.spearman_if + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_correlation_falls_back_to_sentinel() {
        let x = line(3);
        let cons = vec![Constraint::new(0, 1, 1.0).with_dist(1.0)];
        let s = score_model(&x, &cons, 0);
        assert_eq!(s.spearman_if, WORST_CORRELATION);
        assert_eq!(s.pearson_dist, WORST_CORRELATION);
    }

    #[test]
    fn exclusion_interval_drops_short_range_pairs() {
        let x = line(4);
        let cons = vec![
            Constraint::new(0, 1, 9.0).with_dist(1.0),
            Constraint::new(0, 2, 4.0).with_dist(2.0),
            Constraint::new(0, 3, 1.0).with_dist(3.0),
        ];
        // only (0, 2) and (0, 3) remain
        let s = score_model(&x, &cons, 2);
        assert!((s.spearman_if + 1.0).abs() < 1e-12);
    }

    #[test]
    fn annotation_records_observed_distance() {
        let x = line(3);
        let mut cons = vec![Constraint::new(0, 2, 1.0)];
        annotate_structure_distances(&mut cons, &x);
        assert_eq!(cons[0].str_dist, Some(2.0));
    }
}
