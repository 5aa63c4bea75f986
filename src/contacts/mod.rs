pub mod builder;
pub mod chromosome;
pub mod types;

pub use builder::IngestParams;
pub use chromosome::ChromosomeMap;
pub use types::{Constraint, DomainTags, Triple};

use crate::core_types::{GenomicPos, LocusId};

/// Normalized contact data: constraints over dense locus ids, sorted by
/// `(pos1, pos2)`, plus the bookkeeping needed to map ids back.
#[derive(Debug, Clone)]
pub struct ContactMap {
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) positions: Vec<GenomicPos>,
    pub(crate) chromosomes: ChromosomeMap,
}

impl ContactMap {
    pub fn n_loci(&self) -> usize {
        self.positions.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Dense id -> original genomic position.
    pub fn positions(&self) -> &[GenomicPos] {
        &self.positions
    }

    pub fn chromosomes(&self) -> &ChromosomeMap {
        &self.chromosomes
    }

    pub fn id_of(&self, pos: GenomicPos) -> Option<LocusId> {
        self.positions.binary_search(&pos).ok()
    }
}
