use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{ConfigError, EvalError};
use crate::linspace::Linspace;
use crate::membership::{Membership, MembershipFunction};
use crate::terms::Terms;

/// Spacing used when a variable is added without an explicit step.
pub const DEFAULT_STEP: f64 = 1.0;

/// Upper limit on the number of samples in a single universe. A range and step
/// that would produce more points is rejected as an invalid universe.
pub const MAX_UNIVERSE_POINTS: usize = 1 << 24;

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// A copyable handle to a variable registered in [`Variables`].
///
/// Handles remember which registry issued them, so a handle from one
/// [`Variables`] never resolves against another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub(crate) key: VariableKey,
    pub(crate) registry: u64,
}

/// Whether a variable receives crisp inputs or is inferred by the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Antecedent,
    Consequent,
}

/// A closed range sampled at a fixed step. Always non-empty and strictly increasing.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    points: Vec<f64>,
    step: f64,
}

impl Universe {
    pub(crate) fn new(range: RangeInclusive<f64>, step: f64) -> Result<Self, String> {
        let (min, max) = (*range.start(), *range.end());

        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(format!("bounds and step must be finite, got {min}..={max} step {step}"));
        }
        if step <= 0. {
            return Err(format!("step must be positive, got {step}"));
        }
        if max < min {
            return Err(format!("upper bound {max} is below lower bound {min}"));
        }

        let points = Linspace::stepped(min, max, step, MAX_UNIVERSE_POINTS).ok_or_else(|| {
            format!("{min}..={max} step {step} needs more than {MAX_UNIVERSE_POINTS} points")
        })?;

        Ok(Self {
            points: points.collect(),
            step,
        })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn min(&self) -> f64 {
        self.points[0]
    }

    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A named universe with its labelled fuzzy sets. Immutable once registered.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &[f64] {
        self.universe.points()
    }

    pub fn discretization(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn membership_degree(&self, label: &str, x: f64) -> Result<f64, EvalError> {
        self.membership_function(label).map(|mf| mf.degree(x))
    }

    pub(crate) fn membership_function(&self, label: &str) -> Result<&MembershipFunction, EvalError> {
        self.terms.get(label).ok_or_else(|| EvalError::UnknownLabel {
            variable: self.name.clone(),
            term: label.to_owned(),
        })
    }

    /// Degree of `x` in every term, in declaration order.
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|(label, mf)| (label.as_str(), mf.degree(x)))
            .collect()
    }
}

/// Clones keep the registry id of the original, so handles stay valid on both.
#[derive(Clone, Debug)]
pub struct Variables {
    id: u64,
    vars: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
}

impl Default for Variables {
    fn default() -> Self {
        Self::new()
    }
}

impl Variables {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            vars: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }

    fn handle(&self, key: VariableKey) -> Variable {
        Variable {
            key,
            registry: self.id,
        }
    }

    /// Whether `var` was issued by this registry.
    pub fn contains(&self, var: Variable) -> bool {
        self.lookup(var).is_some()
    }

    pub fn add_antecedent(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable, ConfigError> {
        self.add(name, Role::Antecedent, universe_range, terms, step)
    }

    pub fn add_consequent(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable, ConfigError> {
        self.add(name, Role::Consequent, universe_range, terms, step)
    }

    /// If the step value is not provided, it defaults to [`DEFAULT_STEP`]
    pub fn add(
        &mut self,
        name: impl Into<String>,
        role: Role,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable, ConfigError> {
        let name = name.into();

        if self.names.contains_key(&name) {
            return Err(ConfigError::DuplicateVariable { name });
        }
        if terms.is_empty() {
            return Err(ConfigError::NoTerms { variable: name });
        }

        let universe = Universe::new(universe_range, step.unwrap_or(DEFAULT_STEP))
            .map_err(|reason| ConfigError::InvalidUniverse {
                variable: name.clone(),
                reason,
            })?;
        let mut term_map = IndexMap::with_capacity(terms.len());

        for (label, membership) in terms.0 {
            membership
                .validate()
                .map_err(|reason| ConfigError::InvalidMembership {
                    term: format!("{name}.{label}"),
                    reason,
                })?;

            if term_map.contains_key(&label) {
                return Err(ConfigError::DuplicateTerm { variable: name, term: label });
            }

            term_map.insert(label, membership);
        }

        tracing::debug!(
            variable = %name,
            ?role,
            points = universe.len(),
            terms = term_map.len(),
            "registered linguistic variable"
        );

        let key = self.vars.insert(LinguisticVariable {
            name: name.clone(),
            role,
            universe,
            terms: term_map,
        });
        self.names.insert(name, key);

        Ok(self.handle(key))
    }

    pub fn get(&self, var: Variable) -> Option<&LinguisticVariable> {
        self.lookup(var)
    }

    pub fn by_name(&self, name: &str) -> Option<Variable> {
        self.names.get(name).map(|&key| self.handle(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.vars.iter().map(|(key, var)| (self.handle(key), var))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub(crate) fn lookup(&self, var: Variable) -> Option<&LinguisticVariable> {
        if var.registry != self.id {
            return None;
        }

        self.vars.get(var.key)
    }
}

#[cfg(test)]
fn humidity_terms() -> Terms {
    Terms::new()
        .with("low", MembershipFunction::triangular(0., 0., 50.))
        .with("medium", MembershipFunction::triangular(30., 50., 70.))
        .with("high", MembershipFunction::triangular(60., 100., 100.))
}

#[test]
fn test_add_variable() {
    let mut vars = Variables::new();
    let humidity = vars.add_antecedent("humidity", 0. ..=100., humidity_terms(), None).unwrap();
    let var = vars.get(humidity).unwrap();

    assert_eq!(var.name(), "humidity");
    assert_eq!(var.role(), Role::Antecedent);
    assert_eq!(var.universe().len(), 101);
    assert_eq!(var.labels().collect::<Vec<_>>(), vec!["low", "medium", "high"]);
    assert_eq!(vars.by_name("humidity"), Some(humidity));
    assert_eq!(vars.by_name("pressure"), None);
}

#[test]
fn test_membership_degree() {
    let mut vars = Variables::new();
    let humidity = vars.add_antecedent("humidity", 0. ..=100., humidity_terms(), None).unwrap();
    let var = vars.get(humidity).unwrap();

    assert_eq!(var.membership_degree("high", 90.), Ok(0.75));
    assert_eq!(var.membership_degree("medium", 50.), Ok(1.));
    assert_eq!(
        var.membership_degree("soggy", 50.),
        Err(EvalError::UnknownLabel {
            variable: "humidity".into(),
            term: "soggy".into()
        })
    );
    assert_eq!(var.fuzzify(65.), vec![("low", 0.), ("medium", 0.25), ("high", 0.125)]);
}

#[test]
fn test_rejects_bad_configuration() {
    let mut vars = Variables::new();

    assert!(matches!(
        vars.add_antecedent("x", 10. ..=0., humidity_terms(), None),
        Err(ConfigError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add_antecedent("x", 0. ..=10., humidity_terms(), Some(0.)),
        Err(ConfigError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add_antecedent("x", 0. ..=10., humidity_terms(), Some(-1.)),
        Err(ConfigError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add_antecedent("x", 0. ..=1., humidity_terms(), Some(1e-300)),
        Err(ConfigError::InvalidUniverse { .. })
    ));
    assert!(matches!(
        vars.add_antecedent("x", 0. ..=10., Terms::new(), None),
        Err(ConfigError::NoTerms { .. })
    ));
    assert!(matches!(
        vars.add_antecedent(
            "x",
            0. ..=10.,
            Terms::new().with("bad", MembershipFunction::triangular(5., 1., 9.)),
            None
        ),
        Err(ConfigError::InvalidMembership { .. })
    ));
    assert!(matches!(
        vars.add_antecedent(
            "x",
            0. ..=10.,
            humidity_terms().with("low", MembershipFunction::triangular(0., 1., 2.)),
            None
        ),
        Err(ConfigError::DuplicateTerm { .. })
    ));
    assert!(vars.is_empty());

    vars.add_consequent("x", 0. ..=10., humidity_terms(), None).unwrap();

    assert!(matches!(
        vars.add_consequent("x", 0. ..=10., humidity_terms(), None),
        Err(ConfigError::DuplicateVariable { .. })
    ));
}

#[test]
fn test_universe_ends_on_upper_bound() {
    let mut vars = Variables::new();
    let x = vars.add_antecedent("x", 0. ..=0.3, humidity_terms(), Some(0.1)).unwrap();
    let points = vars.get(x).unwrap().universe();

    assert_eq!(points.len(), 4);
    assert_eq!(points.last(), Some(&0.3));
    assert!(points.iter().all(|&y| y <= 0.3));
}

#[test]
fn test_handles_belong_to_their_registry() {
    let mut first = Variables::new();
    let mut second = Variables::new();
    let a = first.add_antecedent("temperature", 0. ..=100., humidity_terms(), None).unwrap();
    let b = second.add_antecedent("humidity", 0. ..=100., humidity_terms(), None).unwrap();

    assert!(first.contains(a));
    assert!(!first.contains(b));
    assert!(first.get(b).is_none());
    assert!(second.get(a).is_none());

    let copy = first.clone();

    assert_eq!(copy.get(a).map(LinguisticVariable::name), Some("temperature"));
}
