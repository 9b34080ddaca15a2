//! Error types for building and evaluating fuzzy systems.

use thiserror::Error;

/// Raised while assembling variables, rules, or a control system. A system
/// that fails to build must not be evaluated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid universe for variable '{variable}': {reason}")]
    InvalidUniverse { variable: String, reason: String },
    #[error("Invalid membership function for term '{term}': {reason}")]
    InvalidMembership { term: String, reason: String },
    #[error("Variable '{name}' is already registered")]
    DuplicateVariable { name: String },
    #[error("Term '{term}' is declared twice on variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },
    #[error("Variable '{variable}' has no terms")]
    NoTerms { variable: String },
    #[error("Variable '{name}' not found")]
    UnknownVariable { name: String },
    #[error("Rule weight {weight} is outside [0, 1]")]
    InvalidWeight { weight: f64 },
    #[error("Rule {rule} concludes on '{variable}', which is not a consequent")]
    NotAConsequent { rule: usize, variable: String },
    #[error("Rule {rule} has '{variable}' in its premise, which is not an antecedent")]
    NotAnAntecedent { rule: usize, variable: String },
    #[error("Rule {rule} references a variable that is not part of this system")]
    ForeignVariable { rule: usize },
    #[error("Rule {rule} has an empty '{connective}' in its premise")]
    EmptyConnective { rule: usize, connective: &'static str },
    #[error("Rule base is empty")]
    EmptyRuleBase,
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by a single evaluation. The system stays usable for later calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("No input value supplied for variable '{variable}'")]
    MissingInput { variable: String },
    #[error("Term '{term}' is not defined on variable '{variable}'")]
    UnknownLabel { variable: String, term: String },
    #[error("Variable '{name}' not found")]
    UnknownVariable { name: String },
    #[error("Input for variable '{variable}' is not a finite number: {value}")]
    NonFiniteInput { variable: String, value: f64 },
    #[error("Variable handle was issued by a different registry than this control system's")]
    ForeignVariable,
}
