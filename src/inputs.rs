use std::collections::HashMap;

use crate::error::EvalError;
use crate::variable::{Variable, Variables};

/// Crisp values for one evaluation, keyed by antecedent.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<Variable, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, var: Variable, val: f64) {
        self.0.insert(var, val);
    }

    pub fn with(mut self, var: Variable, val: f64) -> Self {
        self.add(var, val);
        self
    }

    /// Resolves variable names against `vars`.
    pub fn from_named<'n>(
        vars: &Variables,
        values: impl IntoIterator<Item = (&'n str, f64)>,
    ) -> Result<Self, EvalError> {
        let mut inputs = Inputs::new();

        for (name, val) in values {
            let var = vars.by_name(name).ok_or_else(|| EvalError::UnknownVariable {
                name: name.to_owned(),
            })?;

            inputs.add(var, val);
        }

        Ok(inputs)
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        self.0.get(&var).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn test_from_named() {
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;

    let mut vars = Variables::new();
    let terms = Terms::new().with("any", MembershipFunction::triangular(0., 5., 10.));
    let speed = vars.add_antecedent("speed", 0. ..=10., terms, None).unwrap();

    let inputs = Inputs::from_named(&vars, [("speed", 4.5)]).unwrap();

    assert_eq!(inputs.get(speed), Some(4.5));
    assert_eq!(
        Inputs::from_named(&vars, [("speed", 1.), ("torque", 2.)]).unwrap_err(),
        EvalError::UnknownVariable { name: "torque".into() }
    );
}
