//! Mamdani fuzzy inference.
//!
//! Crisp inputs are fuzzified against the terms of their [`LinguisticVariable`], rule
//! premises are evaluated with Zadeh AND (min) / OR (max), each fired rule clips its
//! consequent terms at its firing strength, the clipped sets are aggregated per output
//! with max, and each aggregate is defuzzified to its centroid.
//!
//! ```
//! use fuzzy_mamdani::{is, Clause, InferenceEngine, Inputs, LinguisticVariable, Rules, Terms, Universe, Variables};
//! use fuzzy_mamdani::MembershipFunction::{Trapezoidal, Triangular};
//!
//! let mut vars = Variables::new();
//! vars.add(LinguisticVariable::antecedent(
//!     "pollutant",
//!     Universe::from_step(0., 200., 0.1)?,
//!     Terms::new()
//!         .with("low", Triangular(0., 0., 30.))
//!         .with("very high", Trapezoidal(120., 150., 200., 200.)),
//! )?)?;
//! vars.add(LinguisticVariable::consequent(
//!     "air_quality",
//!     Universe::from_step(0., 100., 0.1)?,
//!     Terms::new()
//!         .with("good", Trapezoidal(0., 0., 25., 40.))
//!         .with("hazardous", Trapezoidal(85., 95., 100., 100.)),
//! )?)?;
//!
//! let mut rules = Rules::new();
//! rules.add(is("pollutant", "low"), [Clause::new("air_quality", "good")]);
//! rules.add(is("pollutant", "very high"), [Clause::new("air_quality", "hazardous")]);
//!
//! let engine = InferenceEngine::build(vars, rules)?;
//! let outputs = engine.evaluate(&Inputs::new().with("pollutant", 170.))?;
//!
//! assert!(outputs.value("air_quality").unwrap() > 85.);
//! assert_eq!(outputs.activated_rules(), vec![2]);
//! # Ok::<(), fuzzy_mamdani::FuzzyError>(())
//! ```

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod membership;
pub mod ops;
mod outputs;
mod rules;
mod terms;
mod universe;
mod variable;

pub use config::{AntecedentConfig, EngineOptions, RuleConfig, SystemConfig, TermConfig, VariableConfig};
pub use dsl::{is, Antecedent, Clause};
pub use error::{FuzzyError, OutOfDomain, Result};
pub use inference::{InferenceEngine, Session, SessionState};
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use membership::MembershipFunction;
pub use outputs::{Crisp, Outputs, RuleActivation};
pub use rules::{Rule, Rules};
pub use terms::{TermId, Terms};
pub use universe::{Universe, MAX_SAMPLES};
pub use variable::{Fuzzified, LinguisticVariable, Role, VariableKey, Variables};
