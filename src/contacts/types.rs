use crate::core_types::{GenomicPos, LocusId};
use serde::{Deserialize, Serialize};

/// One raw contact as read from a Hi-C list or an expanded matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub pos1: GenomicPos,
    pub pos2: GenomicPos,
    pub if_value: f64,
}

impl Triple {
    pub fn new(pos1: GenomicPos, pos2: GenomicPos, if_value: f64) -> Self {
        Self {
            pos1,
            pos2,
            if_value,
        }
    }
}

/// Optional domain tags, carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTags {
    pub domain1: u32,
    pub domain2: u32,
}

/// A pairwise restraint between two loci. `pos1 < pos2` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub pos1: LocusId,
    pub pos2: LocusId,
    pub if_value: f64,
    /// Target distance, filled in by the converter.
    pub dist: f64,
    /// Distance measured in a reconstructed structure, filled in by the scorer.
    pub str_dist: Option<f64>,
    pub is_inequality: bool,
    pub domains: Option<DomainTags>,
}

impl Constraint {
    pub fn new(i: LocusId, j: LocusId, if_value: f64) -> Self {
        let (pos1, pos2) = if i > j { (j, i) } else { (i, j) };
        Self {
            pos1,
            pos2,
            if_value,
            dist: 0.0,
            str_dist: None,
            is_inequality: false,
            domains: None,
        }
    }

    pub fn with_dist(mut self, dist: f64) -> Self {
        self.dist = dist;
        self
    }

    pub fn inequality(mut self) -> Self {
        self.is_inequality = true;
        self
    }

    /// Sort/lookup key. Inequality restraints order after the equality
    /// restraint on the same pair.
    #[inline(always)]
    pub fn key(&self) -> (LocusId, LocusId, bool) {
        (self.pos1, self.pos2, self.is_inequality)
    }

    #[inline(always)]
    pub fn span(&self) -> usize {
        self.pos2 - self.pos1
    }
}
