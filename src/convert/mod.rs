pub mod adjacency;
pub mod inequality;

pub use adjacency::AdjacencyMode;

use crate::consts::AVG_DIST;
use crate::contacts::{ChromosomeMap, Constraint, ContactMap};
use crate::error::{FoldError, FoldResult};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionParams {
    pub convert_factor: f64,
    pub adjacency: AdjacencyMode,
    pub inequality_constraints: bool,
}

impl ConversionParams {
    pub fn new(convert_factor: f64) -> Self {
        Self {
            convert_factor,
            adjacency: AdjacencyMode::default(),
            inequality_constraints: false,
        }
    }
}

/// Aggregates computed once per conversion factor, shared by every model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContactStats {
    pub mean_if: f64,
    /// Largest IF after augmentation, capped at `avg_adj_if`.
    pub max_if: f64,
    pub total_if: f64,
    /// Mean of `IF^(-convert_factor)`; also the export zoom factor.
    pub scale_factor: f64,
    pub avg_adj_if: f64,
    pub max_distance: f64,
    pub synthesized_adjacent: usize,
}

/// Constraints with target distances, ready for optimization. Read-only
/// once built.
#[derive(Debug, Clone)]
pub struct ContactSet {
    pub constraints: Vec<Constraint>,
    pub chromosomes: ChromosomeMap,
    pub stats: ContactStats,
    pub convert_factor: f64,
}

impl ContactSet {
    pub fn n_loci(&self) -> usize {
        self.chromosomes.len()
    }
}

#[inline(always)]
pub fn target_distance(if_value: f64, convert_factor: f64, scale_factor: f64) -> f64 {
    AVG_DIST / (if_value.powf(convert_factor) * scale_factor)
}

/// Mean IF over existing same-chromosome adjacent pairs, falling back to the
/// mean over everything when no adjacent pair was observed.
pub fn average_adjacent_if(constraints: &[Constraint], chromosomes: &ChromosomeMap) -> f64 {
    let (sum, count) = constraints
        .iter()
        .filter(|c| !c.is_inequality && chromosomes.is_adjacent(c.pos1, c.pos2))
        .fold((0.0, 0usize), |(s, k), c| (s + c.if_value, k + 1));

    if count > 0 {
        return sum / count as f64;
    }

    let mean = constraints.iter().map(|c| c.if_value).sum::<f64>() / constraints.len() as f64;
    warn!(
        "⚠️  No adjacent contacts observed; using mean IF {:.4} for chain constraints",
        mean
    );
    mean
}

pub fn convert(map: &ContactMap, params: &ConversionParams) -> FoldResult<ContactSet> {
    let cf = params.convert_factor;
    if !cf.is_finite() || cf <= 0.0 {
        return Err(FoldError::Config(format!(
            "convert factor must be positive, got {}",
            cf
        )));
    }
    if map.constraints.is_empty() {
        return Err(FoldError::InputShape("contact map is empty".into()));
    }

    let chromosomes = map.chromosomes.clone();
    let mut constraints = map.constraints.clone();

    // 1. Chain connectivity
    let avg_adj_if = average_adjacent_if(&constraints, &chromosomes);
    let synthesized = adjacency::augment(&mut constraints, &chromosomes, avg_adj_if, params.adjacency);
    debug!(
        "Adjacency ({}): avgAdjIF = {:.4}, synthesized {} constraint(s)",
        params.adjacency, avg_adj_if, synthesized
    );

    // 2. Aggregates
    let count = constraints.len() as f64;
    let mut total_if = 0.0;
    let mut raw_max_if = 0.0f64;
    let mut scale_factor = 0.0;
    for c in &constraints {
        total_if += c.if_value;
        raw_max_if = raw_max_if.max(c.if_value);
        scale_factor += c.if_value.powf(-cf);
    }
    scale_factor /= count;
    let max_if = raw_max_if.min(avg_adj_if);

    // 3. Target distances
    let mut max_distance = 0.0f64;
    let mut max_adjacent = 0.0f64;
    for c in constraints.iter_mut() {
        c.dist = target_distance(c.if_value, cf, scale_factor);
        max_distance = max_distance.max(c.dist);
        if chromosomes.is_adjacent(c.pos1, c.pos2) {
            max_adjacent = max_adjacent.max(c.dist);
        }
    }

    if params.inequality_constraints {
        let extra = inequality::synthesize(&chromosomes, max_if, max_adjacent);
        debug!(
            "Added {} inequality constraint(s) bounded at {:.4}",
            extra.len(),
            max_adjacent
        );
        constraints.extend(extra);
        constraints.sort_by_key(|c| c.key());
    }

    let stats = ContactStats {
        mean_if: total_if / count,
        max_if,
        total_if,
        scale_factor,
        avg_adj_if,
        max_distance,
        synthesized_adjacent: synthesized,
    };

    info!(
        "🔁 Converted {} constraints (factor {:.2}): max distance {:.4}, maxIF {:.4}",
        constraints.len(),
        cf,
        max_distance,
        max_if
    );

    Ok(ContactSet {
        constraints,
        chromosomes,
        stats,
        convert_factor: cf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::{IngestParams, Triple};

    fn four_loci() -> ContactMap {
        IngestParams::builder()
            .triples(vec![
                Triple::new(0, 1, 10.0),
                Triple::new(1, 2, 10.0),
                Triple::new(0, 2, 2.0),
                Triple::new(1, 3, 2.0),
            ])
            .build()
            .build_contact_map()
            .unwrap()
    }

    #[test]
    fn missing_adjacent_pair_gets_average_if() {
        let set = convert(&four_loci(), &ConversionParams::new(1.0)).unwrap();
        let c23 = set
            .constraints
            .iter()
            .find(|c| (c.pos1, c.pos2) == (2, 3))
            .unwrap();
        assert_eq!(c23.if_value, 10.0);
        assert_eq!(set.stats.synthesized_adjacent, 1);
        assert_eq!(set.stats.max_if, 10.0);
    }

    #[test]
    fn distances_are_normalized_to_avg_dist() {
        let set = convert(&four_loci(), &ConversionParams::new(1.0)).unwrap();
        // with factor 1 the mean target distance is exactly AVG_DIST
        let mean_d =
            set.constraints.iter().map(|c| c.dist).sum::<f64>() / set.constraints.len() as f64;
        assert!((mean_d - AVG_DIST).abs() < 1e-12);
    }

    #[test]
    fn non_positive_factor_is_rejected() {
        let err = convert(&four_loci(), &ConversionParams::new(0.0)).unwrap_err();
        assert!(matches!(err, FoldError::Config(_)));
    }

    #[test]
    fn inequality_bound_is_loosest_adjacent_target() {
        let params = ConversionParams {
            inequality_constraints: true,
            ..ConversionParams::new(1.0)
        };
        let set = convert(&four_loci(), &params).unwrap();
        let adj_max = set
            .constraints
            .iter()
            .filter(|c| !c.is_inequality && c.span() == 1)
            .map(|c| c.dist)
            .fold(0.0, f64::max);
        let ineq: Vec<_> = set.constraints.iter().filter(|c| c.is_inequality).collect();
        assert_eq!(ineq.len(), 3);
        assert!(ineq.iter().all(|c| c.dist == adj_max));
    }
}
