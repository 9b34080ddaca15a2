//! Membership functions: the degree to which a crisp value belongs to a fuzzy set.

use serde::{Deserialize, Serialize};

/// Anything that maps a crisp value onto a degree in `[0, 1]`.
pub trait Membership {
    fn degree(&self, x: f64) -> f64;
}

/// The membership shapes a term can take.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Left foot, peak, right foot
    Triangular { a: f64, b: f64, c: f64 },
    /// Left foot, left shoulder, right shoulder, right foot
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoidal { a, b, c, d }
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        Self::Gaussian { mean, sigma }
    }

    /// Checks the parameters are finite and ordered. Returns the reason on failure.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let params = match *self {
            Self::Triangular { a, b, c } => vec![a, b, c],
            Self::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
            Self::Gaussian { mean, sigma } => vec![mean, sigma],
        };

        if params.iter().any(|p| !p.is_finite()) {
            return Err(format!("parameters must be finite, got {params:?}"));
        }

        match self {
            Self::Gaussian { sigma, .. } if *sigma <= 0. => Err(format!("sigma must be positive, got {sigma}")),
            Self::Gaussian { .. } => Ok(()),
            _ if params.windows(2).any(|w| w[0] > w[1]) => {
                Err(format!("parameters must be non-decreasing, got {params:?}"))
            },
            _ => Ok(()),
        }
    }
}

impl Membership for MembershipFunction {
    fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                // Checked first so shoulders (a == b or b == c) peak at 1
                if x == b {
                    1.
                } else if x <= a || x >= c {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            },
            Self::Trapezoidal { a, b, c, d } => {
                if b <= x && x <= c {
                    1.
                } else if x <= a || x >= d {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            },
            Self::Gaussian { mean, sigma } => (-(x - mean).powi(2) / (2. * sigma * sigma)).exp(),
        }
    }
}

#[test]
fn test_triangular() {
    let mf = MembershipFunction::triangular(30., 50., 70.);

    assert_eq!(mf.degree(30.), 0.);
    assert_eq!(mf.degree(40.), 0.5);
    assert_eq!(mf.degree(50.), 1.);
    assert_eq!(mf.degree(65.), 0.25);
    assert_eq!(mf.degree(70.), 0.);
    assert_eq!(mf.degree(-10.), 0.);
    assert_eq!(mf.degree(1000.), 0.);
}

#[test]
fn test_triangular_shoulders() {
    let left = MembershipFunction::triangular(0., 0., 20.);
    let right = MembershipFunction::triangular(60., 100., 100.);

    assert_eq!(left.degree(0.), 1.);
    assert_eq!(left.degree(5.), 0.75);
    assert_eq!(left.degree(-1.), 0.);
    assert_eq!(right.degree(90.), 0.75);
    assert_eq!(right.degree(100.), 1.);
    assert_eq!(right.degree(100.5), 0.);
}

#[test]
fn test_triangular_degenerate() {
    let mf = MembershipFunction::triangular(5., 5., 5.);

    assert_eq!(mf.degree(5.), 1.);
    assert_eq!(mf.degree(4.999), 0.);
    assert_eq!(mf.degree(5.001), 0.);
}

#[test]
fn test_trapezoidal() {
    let mf = MembershipFunction::trapezoidal(0., 10., 20., 40.);

    assert_eq!(mf.degree(0.), 0.);
    assert_eq!(mf.degree(5.), 0.5);
    assert_eq!(mf.degree(10.), 1.);
    assert_eq!(mf.degree(15.), 1.);
    assert_eq!(mf.degree(30.), 0.5);
    assert_eq!(mf.degree(40.), 0.);
}

#[test]
fn test_gaussian() {
    let mf = MembershipFunction::gaussian(50., 10.);

    assert_eq!(mf.degree(50.), 1.);
    assert!((mf.degree(60.) - (-0.5f64).exp()).abs() < 1e-12);
    assert_eq!(mf.degree(40.), mf.degree(60.));
}

#[test]
fn test_validate() {
    assert!(MembershipFunction::triangular(0., 0., 20.).validate().is_ok());
    assert!(MembershipFunction::triangular(5., 5., 5.).validate().is_ok());
    assert!(MembershipFunction::triangular(10., 5., 20.).validate().is_err());
    assert!(MembershipFunction::triangular(0., 25., 20.).validate().is_err());
    assert!(MembershipFunction::triangular(0., f64::NAN, 20.).validate().is_err());
    assert!(MembershipFunction::trapezoidal(0., 10., 5., 20.).validate().is_err());
    assert!(MembershipFunction::gaussian(0., 0.).validate().is_err());
    assert!(MembershipFunction::gaussian(0., 1.).validate().is_ok());
}
