use crate::dsl::Expr;
use crate::error::ConfigError;
use crate::variable::Variable;

/// An ordered rule base. Order never changes the result under max
/// aggregation but keeps evaluation reproducible.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: Expr, consequence: (Variable, &str)) {
        self.push(Rule::new(premise, consequence));
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Rules(iter.into_iter().collect())
    }
}

/// "If premise then consequence", scaled by a weight in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) premise: Expr,
    pub(crate) consequence: (Variable, String),
    pub(crate) weight: f64,
}

impl Rule {
    pub fn new(premise: Expr, (var, term): (Variable, &str)) -> Self {
        Rule {
            premise,
            consequence: (var, term.to_owned()),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(ConfigError::InvalidWeight { weight });
        }

        self.weight = weight;

        Ok(self)
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> (Variable, &str) {
        (self.consequence.0, &self.consequence.1)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

#[test]
fn test_rule_weight() {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::variable::Variables;

    let terms = || Terms::new().with("low", MembershipFunction::triangular(0., 0., 10.));
    let mut vars = Variables::new();
    let input = vars.add_antecedent("input", 0. ..=10., terms(), None).unwrap();
    let output = vars.add_consequent("output", 0. ..=10., terms(), None).unwrap();
    let rule = Rule::new(input.is("low"), (output, "open"));

    assert_eq!(rule.weight(), 1.);
    assert_eq!(rule.consequence(), (output, "open"));
    assert_eq!(rule.clone().with_weight(0.5).unwrap().weight(), 0.5);
    assert!(matches!(rule.clone().with_weight(1.5), Err(ConfigError::InvalidWeight { .. })));
    assert!(rule.with_weight(f64::NAN).is_err());
}
