use crate::error::ConfigError;
use crate::rules::Rules;
use crate::variable::{Role, Variables};

/// A validated rule base together with the variables it speaks about.
///
/// Built once and shared by reference between any number of evaluations;
/// nothing in it changes after construction.
#[derive(Clone, Debug)]
pub struct ControlSystem {
    variables: Variables,
    rules: Rules,
}

impl ControlSystem {
    /// Rejects rule bases whose premises read consequents, whose conclusions
    /// write antecedents, or that reference variables registered elsewhere.
    /// Term labels are resolved per evaluation.
    pub fn new(variables: Variables, rules: Rules) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleBase);
        }

        for (i, rule) in rules.iter().enumerate() {
            for (var, _) in rule.premise.propositions() {
                let var = variables
                    .get(var)
                    .ok_or(ConfigError::ForeignVariable { rule: i })?;

                if var.role() != Role::Antecedent {
                    return Err(ConfigError::NotAnAntecedent {
                        rule: i,
                        variable: var.name().to_owned(),
                    });
                }
            }

            let var = variables
                .get(rule.consequence.0)
                .ok_or(ConfigError::ForeignVariable { rule: i })?;

            if var.role() != Role::Consequent {
                return Err(ConfigError::NotAConsequent {
                    rule: i,
                    variable: var.name().to_owned(),
                });
            }
        }

        tracing::debug!(variables = variables.len(), rules = rules.len(), "built control system");

        Ok(Self { variables, rules })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}
