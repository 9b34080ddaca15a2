/// Evenly spaced samples over a closed interval, computed the way `numpy.linspace` does.
pub struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Samples `min..=max` at `step` spacing. The last sample lands on `max`
    /// only when the range is a whole multiple of `step`. Returns `None` when
    /// that would take more than `max_points` samples.
    pub fn stepped(min: f64, max: f64, step: f64, max_points: usize) -> Option<Self> {
        // floor is closest approx to python's int() conversion. Long decimal tails
        // (4.999999999999999999) are an exception, so nudge by a relative epsilon.
        let span = (max - min) / step;
        let span = span + span.abs() * f64::EPSILON;

        // Also rejects NaN and infinite spans
        if !(span < max_points as f64) {
            return None;
        }

        let mut num = span.floor() as usize + 1;
        let mut last = min + step * (num - 1) as f64;

        if last > max {
            // The nudge overshot by round-off only, so the sample is max itself
            if last - max <= step * 1e-9 {
                last = max;
            } else {
                num -= 1;
                last = f64::min(max, min + step * (num - 1) as f64);
            }
        }

        Some(Linspace::new(min, last, num))
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does, which pins
            // the final sample to the end point
            let i = self.index;
            self.index += 1;

            if i > 0 && i + 1 == self.len {
                Some(self.end)
            } else {
                Some(self.start + self.step * i as f64)
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let points: Vec<_> = Linspace::new(0., 1., 5).collect();

    assert_eq!(points, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 7., 1).collect::<Vec<_>>(), vec![3.]);
}

#[test]
fn test_stepped_matches_arange() {
    let points: Vec<_> = Linspace::stepped(0., 40., 1., 1000).unwrap().collect();

    assert_eq!(points.len(), 41);
    assert_eq!(points[0], 0.);
    assert_eq!(points[40], 40.);

    // 0..=1 in steps of 0.3 stops short of the upper bound
    let points: Vec<_> = Linspace::stepped(0., 1., 0.3, 1000).unwrap().collect();

    assert_eq!(points.len(), 4);
    assert!((points[3] - 0.9).abs() < 1e-12);

    assert_eq!(Linspace::stepped(0., 1., 0.1, 1000).unwrap().len(), 11);
}

#[test]
fn test_stepped_stays_within_bounds() {
    let points: Vec<_> = Linspace::stepped(0., 0.3, 0.1, 1000).unwrap().collect();

    assert_eq!(points.len(), 4);
    assert_eq!(points[3], 0.3);

    for (min, max, step) in [
        (0., 0.3, 0.1),
        (0., 0.7, 0.1),
        (-1., 1., 0.2),
        (0.1, 1., 0.01),
        (0., 100., 0.05),
        (0., 1., 0.3),
        (2.5, 9.1, 0.3),
    ] {
        let points: Vec<_> = Linspace::stepped(min, max, step, 100_000).unwrap().collect();

        assert_eq!(points[0], min);
        assert!(points.iter().all(|&p| p <= max), "{min}..={max} step {step}: {points:?}");
        assert!(points.windows(2).all(|w| w[0] < w[1]), "{min}..={max} step {step}");
    }
}

#[test]
fn test_stepped_caps_point_count() {
    assert!(Linspace::stepped(0., 1., 1e-300, 1000).is_none());
    assert!(Linspace::stepped(0., 1., 1e-3, 1000).is_none());
    assert_eq!(Linspace::stepped(0., 1., 1e-3, 1002).unwrap().len(), 1001);
}
