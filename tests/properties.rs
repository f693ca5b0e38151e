//! Property tests for the membership, premise, aggregation and defuzzification laws.

use fuzzy_mamdani::ops::{aggregate_into, centroid, implication};
use fuzzy_mamdani::{is, Antecedent, Clause, MembershipFunction, Universe};
use proptest::prelude::*;

/// Four ordered shape parameters within [-100, 100]
fn ordered_params() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(-100.0..100.0f64).prop_map(|mut p| {
        p.sort_by(|a, b| a.total_cmp(b));
        p
    })
}

fn membership_function() -> impl Strategy<Value = MembershipFunction> {
    (ordered_params(), any::<bool>()).prop_map(|([a, b, c, d], triangular)| {
        if triangular {
            MembershipFunction::Triangular(a, b, d)
        } else {
            MembershipFunction::Trapezoidal(a, b, c, d)
        }
    })
}

fn degrees() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..=1.0f64, 4)
}

fn premise() -> Antecedent {
    is("pollutant", "high")
        .and(is("temperature", "cold").or(is("temperature", "hot")))
        .or(is("humidity", "humid"))
}

fn lookup(degrees: &[f64]) -> impl Fn(&Clause) -> Option<f64> + '_ {
    move |clause: &Clause| {
        let i = match (clause.variable.as_str(), clause.term.as_str()) {
            ("pollutant", "high") => 0,
            ("temperature", "cold") => 1,
            ("temperature", "hot") => 2,
            ("humidity", "humid") => 3,
            _ => return None,
        };

        Some(degrees[i])
    }
}

proptest! {
    #[test]
    fn test_degree_is_bounded(mf in membership_function(), x in -150.0..150.0f64) {
        let degree = mf.degree(x);
        let (lo, hi) = mf.support();

        prop_assert!((0. ..=1.).contains(&degree));

        if x < lo || x > hi {
            prop_assert_eq!(degree, 0.);
        }
    }

    #[test]
    fn test_firing_strength_is_monotone(
        base in degrees(),
        clause in 0..4usize,
        bump in 0.0..=1.0f64
    ) {
        let mut raised = base.clone();

        raised[clause] = f64::min(1., raised[clause] + bump);

        let before = premise().evaluate(&lookup(&base)).unwrap();
        let after = premise().evaluate(&lookup(&raised)).unwrap();

        prop_assert!((0. ..=1.).contains(&before));
        prop_assert!(after >= before);
    }

    #[test]
    fn test_aggregation_is_order_independent(
        strengths in prop::collection::vec(0.0..=1.0f64, 1..8),
        mfs in prop::collection::vec(membership_function(), 8),
    ) {
        let universe = Universe::from_count(-100., 100., 201).unwrap();
        let implicated: Vec<Vec<f64>> = strengths
            .iter()
            .zip(&mfs)
            .map(|(&s, mf)| implication(s, mf.sample(universe.samples())).collect())
            .collect();
        let mut forward = vec![0.; universe.len()];
        let mut backward = vec![0.; universe.len()];

        for set in &implicated {
            aggregate_into(&mut forward, set.iter().copied());
        }
        for set in implicated.iter().rev() {
            aggregate_into(&mut backward, set.iter().copied());
        }

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn test_centroid_is_scale_invariant(
        membership in prop::collection::vec(0.0..=1.0f64, 11),
        scale in 0.01..100.0f64,
    ) {
        prop_assume!(membership.iter().any(|m| *m > 1e-3));

        let universe = Universe::from_count(0., 10., 11).unwrap();
        let scaled: Vec<f64> = membership.iter().map(|m| m * scale).collect();
        let a = centroid(universe.samples(), &membership).unwrap();
        let b = centroid(universe.samples(), &scaled).unwrap();

        prop_assert!((a - b).abs() < 1e-9);
        prop_assert!(a > -1e-9 && a < 10. + 1e-9);
    }

    #[test]
    fn test_unfired_rules_leave_centroid_undefined(mfs in prop::collection::vec(membership_function(), 1..5)) {
        let universe = Universe::from_count(-100., 100., 201).unwrap();
        let mut aggregated = vec![0.; universe.len()];

        for mf in &mfs {
            aggregate_into(&mut aggregated, implication(0., mf.sample(universe.samples())));
        }

        prop_assert_eq!(centroid(universe.samples(), &aggregated), None);
    }
}
