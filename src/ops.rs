use std::iter::Sum;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => ProductionLink::Min.apply(u, v),
            Self::Prod => ProductionLink::Prod.apply(u, v),
            Self::BoundedProd => ProductionLink::BoundedProd.apply(u, v),
            Self::DrasticProd => ProductionLink::DrasticProd.apply(u, v),
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => ProductionLink::Max.apply(u, v),
            Self::ProbOr => ProductionLink::ProbOr.apply(u, v),
            Self::BoundedSum => ProductionLink::BoundedSum.apply(u, v),
            Self::DrasticSum => ProductionLink::DrasticSum.apply(u, v),
        }
    }
}

/// How a rule's firing strength shapes its consequent set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: clip the consequent at the firing strength
    #[default]
    Min,
    /// Larsen: scale the consequent by the firing strength
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, consequent: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
        consequent.into_iter().map(move |v| match self {
            Self::Min => F::min(strength, v),
            Self::Prod => strength * v,
        })
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    /// Pointwise combination of two memberships over the same universe.
    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity over the sampled points: sum(u * mu) / sum(mu)
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Returns `None` when the membership carries no mass, i.e. nothing was inferred.
    pub fn call<F: Float + Sum>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        let maximum = membership.iter().copied().fold(F::zero(), F::max);

        if maximum <= F::zero() {
            return None;
        }

        let maxima = || {
            universe
                .iter()
                .copied()
                .zip(membership.iter().copied())
                .filter_map(move |(u, m)| if m == maximum { Some(u) } else { None })
        };

        match self {
            Self::Cog => {
                let den = membership.iter().copied().sum::<F>();
                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(u, m)| *u * *m)
                    .sum::<F>();

                Some(num / den)
            },
            Self::Boa => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();

                let total_area = areas.iter().copied().sum::<F>();

                if total_area <= F::zero() {
                    // A lone nonzero sample has no width, so fall back to where it sits
                    return maxima().next();
                }

                let target = total_area / two;
                let mut cum_area = F::zero();

                for (i_area, area) in areas.iter().copied().enumerate() {
                    cum_area = cum_area + area;

                    if cum_area >= target {
                        let xp = [cum_area - area, cum_area];
                        let fp = [universe[i_area], universe[i_area + 1]];

                        return interp(Some(target), xp.into_iter().zip(fp)).into_iter().next();
                    }
                }

                universe.last().copied()
            },
            Self::Mom => {
                let (len, sum) = maxima().fold((0usize, F::zero()), |(len, sum), u| (len + 1, sum + u));

                F::from(len).map(|len| sum / len)
            },
            Self::Lom => maxima().reduce(F::max),
            Self::Som => maxima().reduce(F::min),
        }
    }
}

#[test]
fn test_norms() {
    assert_eq!(AndOp::Min.apply(0.3, 0.8), 0.3);
    assert_eq!(AndOp::Prod.apply(0.5, 0.5), 0.25);
    assert_eq!(AndOp::BoundedProd.apply(0.5, 0.25), 0.);
    assert_eq!(AndOp::DrasticProd.apply(1., 0.4), 0.4);
    assert_eq!(AndOp::DrasticProd.apply(0.9, 0.4), 0.);
    assert_eq!(OrOp::Max.apply(0.3, 0.8), 0.8);
    assert_eq!(OrOp::ProbOr.apply(0.5, 0.5), 0.75);
    assert_eq!(OrOp::BoundedSum.apply(0.75, 0.5), 1.);
    assert_eq!(OrOp::DrasticSum.apply(0., 0.4), 0.4);
    assert_eq!(OrOp::DrasticSum.apply(0.2, 0.4), 1.);
}

#[test]
fn test_implication() {
    let consequent = [0., 0.5, 1., 0.5, 0.];

    assert_eq!(
        ImplicationOp::Min.call(0.75, consequent).collect::<Vec<_>>(),
        vec![0., 0.5, 0.75, 0.5, 0.]
    );
    assert_eq!(
        ImplicationOp::Prod.call(0.5, consequent).collect::<Vec<_>>(),
        vec![0., 0.25, 0.5, 0.25, 0.]
    );
}

#[test]
fn test_defuzzification() {
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0., 0.5, 1., 0.5, 0.];
    let ramp = [0., 0., 1., 1., 0.];

    assert_eq!(DefuzzificationOp::Cog.call(&universe, &membership), Some(2.));
    assert_eq!(DefuzzificationOp::Boa.call(&universe, &membership), Some(2.));
    assert_eq!(DefuzzificationOp::Mom.call(&universe, &membership), Some(2.));
    assert_eq!(DefuzzificationOp::Mom.call(&universe, &ramp), Some(2.5));
    assert_eq!(DefuzzificationOp::Som.call(&universe, &ramp), Some(2.));
    assert_eq!(DefuzzificationOp::Lom.call(&universe, &ramp), Some(3.));
}

#[test]
fn test_defuzzification_empty_mass() {
    let universe = [0., 1., 2.];
    let membership = [0., 0., 0.];

    for op in [
        DefuzzificationOp::Cog,
        DefuzzificationOp::Boa,
        DefuzzificationOp::Mom,
        DefuzzificationOp::Lom,
        DefuzzificationOp::Som,
    ] {
        assert_eq!(op.call(&universe, &membership), None);
    }
}
