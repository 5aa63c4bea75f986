use crate::core_types::LocusId;
use crate::error::{FoldError, FoldResult};
use serde::{Deserialize, Serialize};

/// Locus id -> chromosome ordinal. Total over `0..n` and non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeMap {
    ordinals: Vec<u32>,
}

impl ChromosomeMap {
    /// The whole genome treated as one chromosome.
    pub fn single(n: usize) -> Self {
        Self {
            ordinals: vec![0; n],
        }
    }

    /// Builds the map from per-chromosome locus counts, in genome order.
    pub fn from_lengths(lengths: &[usize], n: usize) -> FoldResult<Self> {
        let total: usize = lengths.iter().sum();
        if total != n {
            return Err(FoldError::InputShape(format!(
                "chromosome lengths sum to {} but the contact data has {} loci",
                total, n
            )));
        }

        let mut ordinals = Vec::with_capacity(n);
        for (chr, &len) in lengths.iter().enumerate() {
            ordinals.extend(std::iter::repeat_n(chr as u32, len));
        }
        Ok(Self { ordinals })
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    pub fn chromosome_count(&self) -> usize {
        self.ordinals.last().map_or(0, |&c| c as usize + 1)
    }

    #[inline(always)]
    pub fn chromosome_of(&self, id: LocusId) -> u32 {
        self.ordinals[id]
    }

    #[inline(always)]
    pub fn same_chromosome(&self, i: LocusId, j: LocusId) -> bool {
        self.ordinals[i] == self.ordinals[j]
    }

    /// Consecutive loci on the same chromosome.
    #[inline(always)]
    pub fn is_adjacent(&self, i: LocusId, j: LocusId) -> bool {
        i.abs_diff(j) == 1 && self.same_chromosome(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_become_cumulative_boundaries() {
        let map = ChromosomeMap::from_lengths(&[2, 3, 1], 6).unwrap();
        let got: Vec<u32> = (0..6).map(|i| map.chromosome_of(i)).collect();
        assert_eq!(got, vec![0, 0, 1, 1, 1, 2]);
        assert_eq!(map.chromosome_count(), 3);
        assert!(map.is_adjacent(2, 3));
        assert!(!map.is_adjacent(1, 2));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = ChromosomeMap::from_lengths(&[2, 2], 5).unwrap_err();
        assert!(matches!(err, FoldError::InputShape(_)));
    }
}
