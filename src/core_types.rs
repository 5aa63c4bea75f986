use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Dense locus index in `0..n`, assigned by sorting genomic positions.
pub type LocusId = usize;

/// Genomic position as it appears in the raw contact data.
pub type GenomicPos = u64;

/// Cooperative stop flag shared between the caller and a running
/// reconstruction. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
