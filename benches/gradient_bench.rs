use criterion::{criterion_group, criterion_main, Criterion};
use hicfold::contacts::{IngestParams, Triple};
use hicfold::convert::{convert, ContactSet, ConversionParams};
use hicfold::potential::{ParallelEvaluator, PotentialKind};
use std::hint::black_box;

fn setup_contacts(n: u64) -> ContactSet {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut triples = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            if j - i == 1 || rng.f64() < 0.2 {
                triples.push(Triple::new(i * 5000, j * 5000, 1.0 + 50.0 / (j - i) as f64));
            }
        }
    }
    let map = IngestParams::builder()
        .triples(triples)
        .build()
        .build_contact_map()
        .expect("Failed to ingest contacts");
    convert(&map, &ConversionParams::new(1.0)).expect("Failed to convert contacts")
}

fn criterion_benchmark(c: &mut Criterion) {
    let set = setup_contacts(400);
    let mut rng = fastrand::Rng::with_seed(2);
    let x: Vec<f64> = (0..3 * set.n_loci()).map(|_| rng.f64() * 10.0).collect();
    let mut grad = vec![0.0; x.len()];

    for k in [1, 4] {
        let eval = ParallelEvaluator::new(&set, PotentialKind::Lorentzian, k).expect("Failed to build evaluator");
        c.bench_function(&format!("lorentzian gradient (~16k constraints, K={})", k), |b| {
            b.iter(|| eval.evaluate(black_box(&x), Some(black_box(grad.as_mut_slice()))))
        });
    }

    let eval = ParallelEvaluator::new(&set, PotentialKind::Quadratic, 4).expect("Failed to build evaluator");
    c.bench_function("quadratic gradient (~16k constraints, K=4)", |b| {
        b.iter(|| eval.evaluate(black_box(&x), Some(black_box(grad.as_mut_slice()))))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
