//! Mamdani fuzzy inference.
//!
//! Crisp inputs are matched against linguistic terms, rule premises are
//! combined with fuzzy connectives, each rule clips its consequent term at
//! its firing strength, the clipped sets are aggregated per output and the
//! result is defuzzified back into a crisp value.
//!
//! ```
//! use fuzzy_mamdani::{ControlSystem, Inputs, MamdaniInference, MembershipFunction, Rules, Terms, Variables};
//!
//! let mut vars = Variables::new();
//! let temperature = vars.add_antecedent(
//!     "temperature",
//!     0. ..=40.,
//!     Terms::new()
//!         .with("cold", MembershipFunction::triangular(0., 0., 20.))
//!         .with("hot", MembershipFunction::triangular(20., 40., 40.)),
//!     None,
//! )?;
//! let fan = vars.add_consequent(
//!     "fan",
//!     0. ..=100.,
//!     Terms::new()
//!         .with("slow", MembershipFunction::triangular(0., 0., 50.))
//!         .with("fast", MembershipFunction::triangular(50., 100., 100.)),
//!     None,
//! )?;
//!
//! let mut rules = Rules::new();
//! rules.add(temperature.is("cold"), (fan, "slow"));
//! rules.add(temperature.is("hot"), (fan, "fast"));
//!
//! let system = ControlSystem::new(vars, rules)?;
//! let outputs = MamdaniInference::default().eval(&system, &Inputs::new().with(temperature, 35.))?;
//!
//! assert!(outputs.get(fan).and_then(|speed| speed.crisp()).unwrap() > 50.);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod control;
pub mod dsl;
pub mod error;
pub mod inference;
pub mod inputs;
mod linspace;
mod math;
pub mod membership;
pub mod ops;
pub mod outputs;
pub mod rules;
pub mod terms;
pub mod variable;

pub use config::FuzzyConfig;
pub use control::ControlSystem;
pub use dsl::Expr;
pub use error::{ConfigError, EvalError};
pub use inference::MamdaniInference;
pub use inputs::Inputs;
pub use membership::{Membership, MembershipFunction};
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::{Inferred, Outputs};
pub use rules::{Rule, Rules};
pub use terms::Terms;
pub use variable::{LinguisticVariable, Role, Universe, Variable, Variables, DEFAULT_STEP, MAX_UNIVERSE_POINTS};
