use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;

/// A discretized, strictly increasing domain that a variable's terms are sampled over.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    samples: Vec<f64>,
    step: f64,
}

/// Upper bound on the number of samples in a universe.
pub const MAX_SAMPLES: usize = 1 << 20;

impl Universe {
    /// Samples `min, min + step, ...` up to and including `max`, like `arange(min, max + step, step)`.
    pub fn from_step(min: f64, max: f64, step: f64) -> Result<Self> {
        let invalid = || FuzzyError::InvalidUniverse { min, max, step };

        if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0. || min >= max {
            return Err(invalid());
        }

        // floor is the closest approx to python's int() conversion, but (max - min) / step
        // routinely lands a hair under the integer it should be, so nudge it first
        let num = ((max - min) / step + 1e-9).floor() + 1.;

        if !num.is_finite() || num < 2. || num > MAX_SAMPLES as f64 {
            return Err(invalid());
        }

        // the last sample can overshoot max by an ulp or so
        let samples = Linspace::with_step(min, step, num as usize).map(|u| u.min(max)).collect();

        Self::checked(samples, step).ok_or_else(invalid)
    }

    /// `n` evenly spaced samples over `[min, max]`, both ends included.
    pub fn from_count(min: f64, max: f64, n: usize) -> Result<Self> {
        let step = if n > 1 { (max - min) / (n - 1) as f64 } else { 0. };
        let invalid = || FuzzyError::InvalidUniverse { min, max, step };

        if !(min.is_finite() && max.is_finite() && step.is_finite()) || min >= max || n < 2 || n > MAX_SAMPLES {
            return Err(invalid());
        }

        Self::checked(Linspace::new(min, max, n).collect(), step).ok_or_else(invalid)
    }

    // samples must be strictly increasing; a step below the float spacing around min repeats them
    fn checked(samples: Vec<f64>, step: f64) -> Option<Self> {
        if samples.windows(2).all(|w| w[0] < w[1]) {
            Some(Universe { samples, step })
        } else {
            None
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a universe holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn min(&self) -> f64 {
        self.samples[0]
    }

    pub fn max(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min() <= x && x <= self.max()
    }

    /// Clamps `x` into `[min, max]`.
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.min(), self.max())
    }
}

#[test]
fn test_universe_from_step() {
    let universe = Universe::from_step(0., 200., 0.1).unwrap();

    assert_eq!(universe.len(), 2001);
    assert_eq!(universe.min(), 0.);
    assert!((universe.max() - 200.).abs() < 1e-9);
    assert!(universe.samples().windows(2).all(|w| w[0] < w[1]));

    // max isn't a whole number of steps away: stop short of it
    let universe = Universe::from_step(0., 1., 0.3).unwrap();

    assert_eq!(universe.len(), 4);
    assert!(universe.max() <= 1.);
}

#[test]
fn test_universe_from_count() {
    let universe = Universe::from_count(-1., 1., 5).unwrap();

    assert_eq!(universe.samples(), &[-1., -0.5, 0., 0.5, 1.]);
    assert_eq!(universe.step(), 0.5);
    assert!(universe.contains(0.3));
    assert!(!universe.contains(1.5));
    assert_eq!(universe.clip(1.5), 1.);
}

#[test]
fn test_invalid_universe() {
    assert!(matches!(
        Universe::from_step(0., 10., 0.),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(Universe::from_step(10., 0., 0.1).is_err());
    assert!(Universe::from_step(0., 0.05, 0.1).is_err());
    assert!(Universe::from_step(0., f64::INFINITY, 0.1).is_err());
    assert!(Universe::from_count(0., 1., 1).is_err());
}

#[test]
fn test_universe_too_many_samples() {
    assert!(matches!(
        Universe::from_step(0., 1e300, 1e-10),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        Universe::from_step(0., 1e15, 0.001),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(Universe::from_count(0., 1., MAX_SAMPLES + 1).is_err());
    assert!(Universe::from_step(0., MAX_SAMPLES as f64 - 1., 1.).is_ok());
}

#[test]
fn test_universe_step_below_float_spacing() {
    // the spacing between doubles around 1e16 is 2, so a step of 1 repeats samples
    assert!(matches!(
        Universe::from_step(1e16, 1e16 + 8., 1.),
        Err(FuzzyError::InvalidUniverse { .. })
    ));
    assert!(Universe::from_count(1e16, 1e16 + 8., 9).is_err());
}
