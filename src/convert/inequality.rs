use crate::consts::INEQUALITY_MAX_OFFSET;
use crate::contacts::{ChromosomeMap, Constraint};

/// Upper-bound restraints between near neighbours: loci `k` apart
/// (2 <= k <= INEQUALITY_MAX_OFFSET) on one chromosome should sit no further
/// apart than the loosest adjacent target.
pub fn synthesize(chromosomes: &ChromosomeMap, if_value: f64, bound: f64) -> Vec<Constraint> {
    let n = chromosomes.len();
    let mut out = Vec::new();
    for i in 0..n {
        for k in 2..=INEQUALITY_MAX_OFFSET {
            let j = i + k;
            if j >= n || !chromosomes.same_chromosome(i, j) {
                break;
            }
            out.push(Constraint::new(i, j, if_value).with_dist(bound).inequality());
        }
    }
    out
}
