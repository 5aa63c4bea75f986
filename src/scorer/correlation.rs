use crate::error::{FoldError, FoldResult};
use itertools::Itertools;

/// Values this close to zero on both sides are treated as an absent pair.
const ZERO_PAIR: f64 = 1e-6;

/// 1-based ranks; tied values share the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let order: Vec<usize> = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect();

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

pub fn pearson(a: &[f64], b: &[f64]) -> FoldResult<f64> {
    if a.len() != b.len() {
        return Err(FoldError::CorrelationUndefined(format!(
            "series lengths differ ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 2 {
        return Err(FoldError::CorrelationUndefined(format!(
            "need at least 2 pairs, got {}",
            a.len()
        )));
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let r = cov / (var_a * var_b).sqrt();
    if !r.is_finite() {
        return Err(FoldError::CorrelationUndefined(
            "one of the series has zero variance".into(),
        ));
    }
    Ok(r.clamp(-1.0, 1.0))
}

/// Spearman correlation with coarse binning: pairs that are zero on both
/// sides are dropped, each side is quantized to whole percent of its mean,
/// then ranked with ties averaged.
pub fn spearman(a: &[f64], b: &[f64]) -> FoldResult<f64> {
    let kept: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !(x.abs() < ZERO_PAIR && y.abs() < ZERO_PAIR))
        .map(|(&x, &y)| (x, y))
        .collect();

    if kept.len() < 2 {
        return Err(FoldError::CorrelationUndefined(format!(
            "need at least 2 non-zero pairs, got {}",
            kept.len()
        )));
    }

    let n = kept.len() as f64;
    let mean_a = kept.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = kept.iter().map(|p| p.1).sum::<f64>() / n;

    let qa: Vec<f64> = kept.iter().map(|p| (p.0 * 100.0 / mean_a).trunc()).collect();
    let qb: Vec<f64> = kept.iter().map(|p| (p.1 * 100.0 / mean_b).trunc()).collect();
    if qa.iter().chain(&qb).any(|v| !v.is_finite()) {
        return Err(FoldError::CorrelationUndefined(
            "series mean is zero".into(),
        ));
    }

    pearson(&average_ranks(&qa), &average_ranks(&qb))
}
