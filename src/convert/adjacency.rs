use crate::contacts::{ChromosomeMap, Constraint};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a weak existing adjacent constraint is brought up to `avgAdjIF`.
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
pub enum AdjacencyMode {
    /// Look the pair up in the sorted list and swap in a fresh constraint.
    Replace,
    /// Raise the IF of the existing constraint in place, keeping its tags.
    #[default]
    Boost,
}

/// Guarantees every consecutive same-chromosome pair has a constraint with
/// `IF >= target_if`. Expects `constraints` sorted by key and leaves it sorted.
/// Returns how many constraints were synthesized.
pub fn augment(
    constraints: &mut Vec<Constraint>,
    chromosomes: &ChromosomeMap,
    target_if: f64,
    mode: AdjacencyMode,
) -> usize {
    let added = match mode {
        AdjacencyMode::Replace => replace_weak(constraints, chromosomes, target_if),
        AdjacencyMode::Boost => boost_weak(constraints, chromosomes, target_if),
    };
    if added > 0 {
        constraints.sort_by_key(|c| c.key());
    }
    added
}

fn replace_weak(constraints: &mut Vec<Constraint>, chromosomes: &ChromosomeMap, target_if: f64) -> usize {
    let n = chromosomes.len();
    let mut fresh = Vec::new();

    for i in 0..n.saturating_sub(1) {
        if !chromosomes.same_chromosome(i, i + 1) {
            continue;
        }
        match constraints.binary_search_by_key(&(i, i + 1, false), |c| c.key()) {
            Ok(idx) => {
                if constraints[idx].if_value < target_if {
                    constraints[idx] = Constraint::new(i, i + 1, target_if);
                }
            }
            Err(_) => fresh.push(Constraint::new(i, i + 1, target_if)),
        }
    }

    let added = fresh.len();
    constraints.extend(fresh);
    added
}

fn boost_weak(constraints: &mut Vec<Constraint>, chromosomes: &ChromosomeMap, target_if: f64) -> usize {
    let n = chromosomes.len();
    // covered[i] is set once (i, i + 1) is known to be strong enough
    let mut covered = vec![false; n];

    for c in constraints.iter_mut() {
        if c.is_inequality || !chromosomes.is_adjacent(c.pos1, c.pos2) {
            continue;
        }
        if c.if_value < target_if {
            c.if_value = target_if;
        }
        covered[c.pos1] = true;
    }

    let mut added = 0;
    for i in 0..n.saturating_sub(1) {
        if !covered[i] && chromosomes.same_chromosome(i, i + 1) {
            constraints.push(Constraint::new(i, i + 1, target_if));
            added += 1;
        }
    }
    added
}
