mod common;

use common::{contact_set, random_coords, random_triples, relative_error};
use hicfold::potential::{ParallelEvaluator, PotentialKind};
use rstest::rstest;

fn evaluate(set: &hicfold::convert::ContactSet, kind: PotentialKind, k: usize, x: &[f64]) -> (f64, Vec<f64>) {
    let eval = ParallelEvaluator::new(set, kind, k).unwrap();
    let mut grad = vec![0.0; x.len()];
    let cost = eval.evaluate(x, Some(&mut grad)).unwrap();
    (cost, grad)
}

fn assert_close(serial: &(f64, Vec<f64>), parallel: &(f64, Vec<f64>)) {
    assert!(
        relative_error(serial.0, parallel.0) < 1e-9,
        "cost {} vs {}",
        serial.0,
        parallel.0
    );
    let scale = serial.1.iter().fold(0.0f64, |m, g| m.max(g.abs()));
    for (a, b) in serial.1.iter().zip(&parallel.1) {
        assert!((a - b).abs() <= 1e-9 * scale, "gradient {} vs {}", a, b);
    }
}

#[rstest]
fn worker_count_does_not_change_the_result(
    #[values(PotentialKind::Quadratic, PotentialKind::Lorentzian, PotentialKind::LorentzianInequality)]
    kind: PotentialKind,
    #[values(2, 4, 8)] k: usize,
) {
    println!("\n=== TEST: {} with {} workers matches serial ===", kind, k);
    let set = contact_set(random_triples(30, 120, 7), 1.0);
    let x = random_coords(set.n_loci(), 3, kind.default_cube() * 10.0);

    let serial = evaluate(&set, kind, 1, &x);
    let parallel = evaluate(&set, kind, k, &x);
    assert_close(&serial, &parallel);
}

#[rstest]
fn fifty_points_two_hundred_constraints(
    #[values(PotentialKind::Quadratic, PotentialKind::Lorentzian)] kind: PotentialKind,
) {
    println!("\n=== TEST: 50 loci / 200 constraints, K=1 vs K=4 ({}) ===", kind);
    let set = contact_set(random_triples(50, 200, 42), 1.0);
    assert_eq!(set.n_loci(), 50);
    assert!(set.constraints.len() > 150);

    let x = random_coords(50, 9, 5.0);
    let serial = evaluate(&set, kind, 1, &x);
    let parallel = evaluate(&set, kind, 4, &x);
    assert_close(&serial, &parallel);
}

#[test]
fn same_worker_count_is_bit_identical() {
    println!("\n=== TEST: repeated evaluation with K=4 is bit-identical ===");
    let set = contact_set(random_triples(40, 160, 5), 1.2);
    let x = random_coords(set.n_loci(), 17, 4.0);
    let a = evaluate(&set, PotentialKind::Lorentzian, 4, &x);
    let b = evaluate(&set, PotentialKind::Lorentzian, 4, &x);
    assert_eq!(a.0.to_bits(), b.0.to_bits());
    assert_eq!(a.1, b.1);
}

#[test]
fn value_only_matches_value_with_gradient() {
    let set = contact_set(random_triples(20, 60, 1), 1.0);
    let x = random_coords(set.n_loci(), 2, 3.0);
    let eval = ParallelEvaluator::new(&set, PotentialKind::Lorentzian, 3).unwrap();
    let mut grad = vec![0.0; x.len()];
    let with_grad = eval.evaluate(&x, Some(&mut grad)).unwrap();
    let without = eval.evaluate(&x, None).unwrap();
    assert_eq!(with_grad.to_bits(), without.to_bits());
}
