use num::Float;

/// Evenly spaced samples over a closed interval, computed the same way numpy.linspace does.
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }

    /// Samples starting at `start`, `step` apart.
    pub fn with_step(start: F, step: F, n: usize) -> Self {
        Linspace {
            start,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;
            // start + step * i rather than accumulating, so error doesn't build up
            Some(self.start + self.step * F::from(i)?)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let samples: Vec<f64> = Linspace::new(0., 1., 5).collect();

    assert_eq!(samples, vec![0., 0.25, 0.5, 0.75, 1.]);

    let samples: Vec<f64> = Linspace::with_step(10., 2.5, 3).collect();

    assert_eq!(samples, vec![10., 12.5, 15.]);
    assert_eq!(Linspace::new(0f64, 1., 0).count(), 0);
}
