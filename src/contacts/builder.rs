use crate::contacts::chromosome::ChromosomeMap;
use crate::contacts::types::{Constraint, Triple};
use crate::contacts::ContactMap;
use crate::core_types::{GenomicPos, LocusId};
use crate::error::{FoldError, FoldResult};
use fnv::FnvHashMap;
use itertools::Itertools;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct IngestParams {
    pub triples: Vec<Triple>,
    /// Loci per chromosome, in genome order. `None` means one chromosome.
    #[builder(default)]
    pub chr_lens: Option<Vec<usize>>,
    /// Contacts with `IF <= contact_threshold` are dropped.
    #[builder(default = 0.0)]
    pub contact_threshold: f64,
}

impl IngestParams {
    pub fn build_contact_map(self) -> FoldResult<ContactMap> {
        let raw_count = self.triples.len();

        // 1. Filter and collapse duplicate pairs (last one wins)
        let mut pairs: FnvHashMap<(GenomicPos, GenomicPos), f64> = FnvHashMap::default();
        for t in &self.triples {
            if !t.if_value.is_finite() {
                return Err(FoldError::InputShape(format!(
                    "malformed contact ({}, {}): IF = {}",
                    t.pos1, t.pos2, t.if_value
                )));
            }
            if t.pos1 == t.pos2 || t.if_value <= self.contact_threshold {
                continue;
            }
            let key = if t.pos1 < t.pos2 {
                (t.pos1, t.pos2)
            } else {
                (t.pos2, t.pos1)
            };
            pairs.insert(key, t.if_value);
        }

        if pairs.is_empty() {
            return Err(FoldError::InputShape(format!(
                "no contacts left after filtering {} input triples (threshold {})",
                raw_count, self.contact_threshold
            )));
        }

        // 2. Dense ids from sorted distinct positions
        let positions: Vec<GenomicPos> = pairs
            .keys()
            .flat_map(|&(a, b)| [a, b])
            .sorted_unstable()
            .dedup()
            .collect();

        let id_of: FnvHashMap<GenomicPos, LocusId> = positions
            .iter()
            .enumerate()
            .map(|(id, &pos)| (pos, id))
            .collect();

        // 3. Remap
        let mut constraints: Vec<Constraint> = pairs
            .into_iter()
            .map(|((a, b), if_value)| Constraint::new(id_of[&a], id_of[&b], if_value))
            .collect();
        constraints.sort_unstable_by_key(|c| c.key());

        let n = positions.len();
        let chromosomes = match &self.chr_lens {
            Some(lens) => ChromosomeMap::from_lengths(lens, n)?,
            None => ChromosomeMap::single(n),
        };

        debug!(
            "Dropped {} of {} raw contacts during filtering",
            raw_count - constraints.len(),
            raw_count
        );
        info!(
            "📥 Ingested {} contacts over {} loci ({} chromosome(s))",
            constraints.len(),
            n,
            chromosomes.chromosome_count()
        );

        Ok(ContactMap {
            constraints,
            positions,
            chromosomes,
        })
    }
}
