//! Mamdani min/max composition: Zadeh AND/OR, min implication, max aggregation
//! and centroid defuzzification.

use std::iter::Sum;

use num::Float;

/// Zadeh AND (minimum t-norm) for combining propositions in a rule premise.
pub fn and<F: Float>(u: F, v: F) -> F {
    F::min(u, v)
}

/// Zadeh OR (maximum t-conorm) for combining propositions in a rule premise.
pub fn or<F: Float>(u: F, v: F) -> F {
    F::max(u, v)
}

/// Mamdani (min) implication: clips a consequent membership at the rule's firing strength.
pub fn implication<F: Float>(strength: F, membership: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
    membership.into_iter().map(move |m| F::min(strength, m))
}

/// Max aggregation of two implicated sets, pointwise.
pub fn aggregate<F: Float>(u: impl IntoIterator<Item = F>, v: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
    u.into_iter().zip(v).map(|(u, v)| F::max(u, v))
}

/// Folds `implicated` into `aggregated` in place with max.
pub fn aggregate_into<F: Float>(aggregated: &mut [F], implicated: impl IntoIterator<Item = F>) {
    for (acc, m) in aggregated.iter_mut().zip(implicated) {
        *acc = F::max(*acc, m);
    }
}

/// Center of area, `sum(u * m) / sum(m)` over the samples. `None` when the set is
/// empty (every membership is 0), where the centroid is undefined.
pub fn centroid<F: Float + Sum>(universe: &[F], membership: &[F]) -> Option<F> {
    debug_assert_eq!(universe.len(), membership.len());

    let den = membership.iter().copied().sum::<F>();

    if den <= F::zero() || !den.is_finite() {
        return None;
    }

    let num = universe
        .iter()
        .zip(membership)
        .map(|(&u, &m)| u * m)
        .sum::<F>();

    Some(num / den)
}

#[test]
fn test_and_or() {
    assert_eq!(and(0.3, 0.7), 0.3);
    assert_eq!(or(0.3, 0.7), 0.7);
    assert_eq!(and(0.5f32, 0.5), 0.5);
}

#[test]
fn test_implication_clips() {
    let clipped: Vec<f64> = implication(0.6, [0., 0.5, 1., 0.7, 0.]).collect();

    assert_eq!(clipped, vec![0., 0.5, 0.6, 0.6, 0.]);

    let zero: Vec<f64> = implication(0., [0.2, 1.]).collect();

    assert_eq!(zero, vec![0., 0.]);
}

#[test]
fn test_aggregate() {
    let agg: Vec<f64> = aggregate([0., 0.4, 0.2], [0.1, 0.3, 0.2]).collect();

    assert_eq!(agg, vec![0.1, 0.4, 0.2]);

    let mut acc = vec![0.; 3];

    aggregate_into(&mut acc, [0.1, 0.3, 0.2]);
    aggregate_into(&mut acc, [0., 0.4, 0.2]);

    assert_eq!(acc, agg);
}

#[test]
fn test_centroid() {
    let universe = [0., 1., 2., 3., 4.];

    assert_eq!(centroid(&universe, &[0., 1., 1., 1., 0.]), Some(2.));
    assert_eq!(centroid(&universe, &[1., 0., 0., 0., 0.]), Some(0.));
    assert_eq!(centroid(&universe, &[0., 0., 0., 1., 1.]), Some(3.5));
}

#[test]
fn test_centroid_undefined() {
    assert_eq!(centroid(&[0., 1., 2.], &[0., 0., 0.]), None);
}

#[test]
fn test_centroid_scale_invariant() {
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0.1, 0.4, 0.9, 0.3, 0.];
    let scaled: Vec<f64> = membership.iter().map(|m| m * 0.25).collect();
    let a = centroid(&universe, &membership).unwrap();
    let b = centroid(&universe, &scaled).unwrap();

    assert!((a - b).abs() < 1e-12);
}
