use indexmap::IndexMap;

use crate::variable::Variable;

/// The crisp result for one output variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inferred {
    Crisp(f64),
    /// No rule contributed any membership, so there is nothing to defuzzify
    Undefined,
}

impl Inferred {
    pub fn crisp(self) -> Option<f64> {
        match self {
            Self::Crisp(value) => Some(value),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        self == Self::Undefined
    }
}

impl From<Option<f64>> for Inferred {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Undefined, Self::Crisp)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct InferredOutput {
    pub(crate) name: String,
    pub(crate) value: Inferred,
    pub(crate) aggregated: Vec<f64>,
    pub(crate) firing_strength: f64,
}

/// Results of one evaluation, one entry per consequent in the control system.
#[derive(Clone, Debug, Default)]
pub struct Outputs(pub(crate) IndexMap<Variable, InferredOutput>);

impl Outputs {
    pub fn get(&self, var: Variable) -> Option<Inferred> {
        self.0.get(&var).map(|out| out.value)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Inferred> {
        self.0.values().find(|out| out.name == name).map(|out| out.value)
    }

    /// The aggregated membership over the variable's universe, before defuzzification.
    pub fn aggregated(&self, var: Variable) -> Option<&[f64]> {
        self.0.get(&var).map(|out| out.aggregated.as_slice())
    }

    /// Strongest weighted firing strength among the rules concluding on `var`.
    pub fn firing_strength(&self, var: Variable) -> Option<f64> {
        self.0.get(&var).map(|out| out.firing_strength)
    }

    /// Strongest firing strength across every output.
    pub fn inferred_cf(&self) -> f64 {
        self.0.values().map(|out| out.firing_strength).fold(0., f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Inferred)> {
        self.0.values().map(|out| (out.name.as_str(), out.value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn test_inferred() {
    assert_eq!(Inferred::from(Some(3.5)).crisp(), Some(3.5));
    assert!(Inferred::from(None).is_undefined());
    assert_eq!(Inferred::Undefined.crisp(), None);
}
