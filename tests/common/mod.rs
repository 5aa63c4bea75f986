#![allow(dead_code)]

use hicfold::contacts::{ContactMap, IngestParams, Triple};
use hicfold::convert::{convert, ContactSet, ConversionParams};

/// Routes library logs through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

pub fn ingest(triples: Vec<Triple>) -> ContactMap {
    IngestParams::builder()
        .triples(triples)
        .build()
        .build_contact_map()
        .expect("ingestion failed")
}

pub fn contact_set(triples: Vec<Triple>, convert_factor: f64) -> ContactSet {
    convert(&ingest(triples), &ConversionParams::new(convert_factor)).expect("conversion failed")
}

pub fn dist(x: &[f64], i: usize, j: usize) -> f64 {
    hicfold::structure::distance(x, i, j)
}

/// Points on a helix, consecutive loci 1.28 apart.
pub fn helix(n: usize) -> Vec<f64> {
    (0..n)
        .flat_map(|i| {
            let t = 0.6 * i as f64;
            [2.0 * t.cos(), 2.0 * t.sin(), 0.5 * i as f64]
        })
        .collect()
}

/// The 2x2x2 unit cube walked as a chain, so consecutive loci are 1 apart.
pub fn cube_chain() -> Vec<f64> {
    let corners = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
    ];
    corners.iter().flatten().copied().collect()
}

/// All-pairs contacts with `IF = d^(-1/alpha)`, so converting with
/// factor `alpha` recovers distances proportional to the originals.
pub fn triples_from_structure(x: &[f64], alpha: f64) -> Vec<Triple> {
    let n = x.len() / 3;
    let mut out = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            let d = dist(x, i, j);
            out.push(Triple::new(i as u64 * 5000, j as u64 * 5000, d.powf(-1.0 / alpha)));
        }
    }
    out
}

/// `m` random contacts among `n` loci, every consecutive pair included.
pub fn random_triples(n: usize, m: usize, seed: u64) -> Vec<Triple> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut out: Vec<Triple> = (0..n - 1)
        .map(|i| Triple::new(i as u64 * 1000, (i + 1) as u64 * 1000, 5.0 + rng.f64() * 5.0))
        .collect();
    while out.len() < m {
        let i = rng.usize(0..n);
        let j = rng.usize(0..n);
        if i.abs_diff(j) < 2 {
            continue;
        }
        out.push(Triple::new(i as u64 * 1000, j as u64 * 1000, 0.2 + rng.f64() * 4.0));
    }
    out
}

pub fn random_coords(n: usize, seed: u64, edge: f64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..3 * n).map(|_| rng.f64() * edge).collect()
}

pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
}
