use std::ops::{BitAnd, BitOr, Not};

use crate::variable::Variable;

/// A rule premise: propositions of the form "variable is term" joined by
/// fuzzy connectives.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Variable, String),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn and2(self, rhs: Expr, rhs2: Expr) -> Self {
        self.and(rhs).and(rhs2)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Every "variable is term" leaf, left to right.
    pub fn propositions(&self) -> Vec<(Variable, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<(Variable, &'p str)>) {
            match expr {
                Expr::Is(var, term) => out.push((*var, term)),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl Variable {
    pub fn is(self, term: impl Into<String>) -> Expr {
        Expr::Is(self, term.into())
    }
}

#[test]
fn test_operators_build_tree() {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::variable::Variables;

    let terms = || Terms::new().with("any", MembershipFunction::triangular(0., 5., 10.));
    let mut vars = Variables::new();
    let temperature = vars.add_antecedent("temperature", 0. ..=10., terms(), None).unwrap();
    let humidity = vars.add_antecedent("humidity", 0. ..=10., terms(), None).unwrap();

    let built = temperature.is("cold").and(humidity.is("high")).or(humidity.is("low").not());
    let overloaded = (temperature.is("cold") & humidity.is("high")) | !humidity.is("low");

    assert_eq!(built, overloaded);
    assert_eq!(
        overloaded.propositions(),
        vec![(temperature, "cold"), (humidity, "high"), (humidity, "low")]
    );
}
