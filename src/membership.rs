use serde::{Deserialize, Serialize};

/// A piecewise-linear membership function.
///
/// Serialized as `{"type": "triangular", "points": [a, b, c]}` or
/// `{"type": "trapezoidal", "points": [a, b, c, d]}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "lowercase")]
pub enum MembershipFunction {
    /// Rises from 0 at `a` to 1 at `b`, falls back to 0 at `c`.
    Triangular(f64, f64, f64),
    /// Rises from 0 at `a` to 1 at `b`, stays at 1 until `c`, falls to 0 at `d`.
    Trapezoidal(f64, f64, f64, f64),
}

impl MembershipFunction {
    /// Membership degree of `x`. Total over the real line: 0 outside of the support,
    /// always within `[0, 1]`. A zero-width edge (`a == b` or `c == d`) is a step.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular(a, b, c) => trapezoid(x, a, b, b, c),
            Self::Trapezoidal(a, b, c, d) => trapezoid(x, a, b, c, d),
        }
    }

    /// Parameters in order, `[a, b, c]` or `[a, b, c, d]`.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Self::Triangular(a, b, c) => vec![a, b, c],
            Self::Trapezoidal(a, b, c, d) => vec![a, b, c, d],
        }
    }

    /// Closed interval outside of which the degree is 0.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular(a, _, c) => (a, c),
            Self::Trapezoidal(a, _, _, d) => (a, d),
        }
    }

    /// Parameters are finite and non-decreasing.
    pub fn is_valid(&self) -> bool {
        let params = self.params();

        params.iter().all(|p| p.is_finite()) && params.windows(2).all(|w| w[0] <= w[1])
    }

    /// Samples the function at every point of `universe`.
    pub fn sample(&self, universe: &[f64]) -> Vec<f64> {
        universe.iter().map(|&u| self.degree(u)).collect()
    }
}

fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    // a <= x < b implies b > a, and c < x <= d implies d > c, so neither ramp divides by zero
    let y = if x.is_nan() || x < a || x > d {
        0.
    } else if x < b {
        (x - a) / (b - a)
    } else if x <= c {
        1.
    } else {
        (d - x) / (d - c)
    };

    y.clamp(0., 1.)
}

#[test]
fn test_triangular() {
    let mf = MembershipFunction::Triangular(20., 25., 30.);

    assert_eq!(mf.degree(20.), 0.);
    assert_eq!(mf.degree(22.5), 0.5);
    assert_eq!(mf.degree(25.), 1.);
    assert_eq!(mf.degree(27.5), 0.5);
    assert_eq!(mf.degree(30.), 0.);
    assert_eq!(mf.degree(-100.), 0.);
    assert_eq!(mf.degree(100.), 0.);
}

#[test]
fn test_trapezoidal() {
    let mf = MembershipFunction::Trapezoidal(20., 40., 60., 80.);

    assert_eq!(mf.degree(10.), 0.);
    assert_eq!(mf.degree(30.), 0.5);
    assert_eq!(mf.degree(40.), 1.);
    assert_eq!(mf.degree(50.), 1.);
    assert_eq!(mf.degree(60.), 1.);
    assert_eq!(mf.degree(70.), 0.5);
    assert_eq!(mf.degree(80.), 0.);
}

#[test]
fn test_degenerate_edges_are_steps() {
    let left_shoulder = MembershipFunction::Triangular(0., 0., 30.);

    assert_eq!(left_shoulder.degree(0.), 1.);
    assert_eq!(left_shoulder.degree(15.), 0.5);
    assert_eq!(left_shoulder.degree(-0.1), 0.);

    let right_shoulder = MembershipFunction::Trapezoidal(120., 150., 200., 200.);

    assert_eq!(right_shoulder.degree(200.), 1.);
    assert_eq!(right_shoulder.degree(200.1), 0.);

    let spike = MembershipFunction::Triangular(5., 5., 5.);

    assert_eq!(spike.degree(5.), 1.);
    assert_eq!(spike.degree(5.0001), 0.);
    assert_eq!(spike.degree(f64::NAN), 0.);
}

#[test]
fn test_validity() {
    assert!(MembershipFunction::Trapezoidal(0., 0., 14., 22.).is_valid());
    assert!(!MembershipFunction::Triangular(30., 25., 20.).is_valid());
    assert!(!MembershipFunction::Trapezoidal(0., 10., 5., 20.).is_valid());
    assert!(!MembershipFunction::Triangular(0., f64::NAN, 1.).is_valid());
    assert_eq!(MembershipFunction::Triangular(1., 2., 3.).support(), (1., 3.));
}

#[test]
fn test_serde_shape() {
    let mf: MembershipFunction = serde_json::from_str(r#"{"type": "trapezoidal", "points": [0, 0, 25, 40]}"#).unwrap();

    assert_eq!(mf, MembershipFunction::Trapezoidal(0., 0., 25., 40.));
}
