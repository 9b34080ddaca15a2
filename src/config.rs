//! Declarative fuzzy systems.
//!
//! A configuration lists the engine's operator choices, the linguistic
//! variables with their terms, and the rule base:
//!
//! ```toml
//! [engine]
//! defuzz_op = "cog"
//!
//! [[variable]]
//! name = "temperature"
//! role = "antecedent"
//! min = 0.0
//! max = 40.0
//!
//! [variable.terms]
//! cold = { shape = "triangular", a = 0.0, b = 0.0, c = 20.0 }
//!
//! [[variable]]
//! name = "curtain"
//! role = "consequent"
//! min = 0.0
//! max = 100.0
//!
//! [variable.terms]
//! closed = { shape = "triangular", a = 60.0, b = 100.0, c = 100.0 }
//!
//! [[rule]]
//! if = { is = { variable = "temperature", term = "cold" } }
//! then = { variable = "curtain", term = "closed" }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::control::ControlSystem;
use crate::dsl::Expr;
use crate::error::ConfigError;
use crate::inference::MamdaniInference;
use crate::membership::MembershipFunction;
use crate::rules::{Rule, Rules};
use crate::terms::Terms;
use crate::variable::{Role, Variable, Variables};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuzzyConfig {
    #[serde(default)]
    pub engine: MamdaniInference,
    #[serde(rename = "variable", default)]
    pub variables: Vec<VariableConfig>,
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableConfig {
    pub name: String,
    pub role: Role,
    pub min: f64,
    pub max: f64,
    /// Defaults to [`DEFAULT_STEP`](crate::variable::DEFAULT_STEP)
    #[serde(default)]
    pub step: Option<f64>,
    pub terms: IndexMap<String, MembershipFunction>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(rename = "if")]
    pub premise: PremiseConfig,
    #[serde(rename = "then")]
    pub consequence: TermRef,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermRef {
    pub variable: String,
    pub term: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiseConfig {
    Is(TermRef),
    And(Vec<PremiseConfig>),
    Or(Vec<PremiseConfig>),
    Not(Box<PremiseConfig>),
}

impl FuzzyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        tracing::debug!(path = %path.display(), "loading fuzzy configuration");

        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Registers every variable, resolves rule references by name and
    /// validates the result.
    pub fn build(&self) -> Result<(ControlSystem, MamdaniInference), ConfigError> {
        let mut vars = Variables::new();

        for var in &self.variables {
            let terms: Terms = var.terms.iter().map(|(label, mf)| (label.as_str(), *mf)).collect();

            vars.add(&var.name, var.role, var.min..=var.max, terms, var.step)?;
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for (i, rule) in self.rules.iter().enumerate() {
            let premise = rule.premise.to_expr(&vars, i)?;
            let target = resolve(&vars, &rule.consequence.variable)?;
            let mut built = Rule::new(premise, (target, rule.consequence.term.as_str()));

            if let Some(weight) = rule.weight {
                built = built.with_weight(weight)?;
            }

            rules.push(built);
        }

        Ok((ControlSystem::new(vars, rules)?, self.engine))
    }
}

impl PremiseConfig {
    fn to_expr(&self, vars: &Variables, rule: usize) -> Result<Expr, ConfigError> {
        match self {
            Self::Is(term) => Ok(resolve(vars, &term.variable)?.is(term.term.as_str())),
            Self::And(exprs) => join_all(exprs, vars, rule, "and", Expr::and),
            Self::Or(exprs) => join_all(exprs, vars, rule, "or", Expr::or),
            Self::Not(expr) => Ok(Expr::Not(Box::new(expr.to_expr(vars, rule)?))),
        }
    }
}

// Left fold, so `and = [a, b, c]` reads as `(a and b) and c`
fn join_all(
    exprs: &[PremiseConfig],
    vars: &Variables,
    rule: usize,
    connective: &'static str,
    join: fn(Expr, Expr) -> Expr,
) -> Result<Expr, ConfigError> {
    let mut iter = exprs.iter();
    let first = iter
        .next()
        .ok_or(ConfigError::EmptyConnective { rule, connective })?
        .to_expr(vars, rule)?;

    iter.try_fold(first, |acc, expr| -> Result<Expr, ConfigError> {
        Ok(join(acc, expr.to_expr(vars, rule)?))
    })
}

fn resolve(vars: &Variables, name: &str) -> Result<Variable, ConfigError> {
    vars.by_name(name).ok_or_else(|| ConfigError::UnknownVariable { name: name.to_owned() })
}
