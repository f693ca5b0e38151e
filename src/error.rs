use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

/// Configuration, input and session errors.
///
/// Out of domain inputs and undefined defuzzifications are not errors, see
/// [`OutOfDomain`] and [`Crisp::Undefined`](crate::Crisp::Undefined).
#[derive(Debug, Error)]
pub enum FuzzyError {
    /// A rule refers to a (variable, term) pair that was never registered. `rule` is
    /// the 1-based rule id, or 0 when the clause was resolved outside of a rule.
    #[error("rule {rule}: unknown clause {variable}[{term}]")]
    UnknownClause { rule: usize, variable: String, term: String },
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("variable '{variable}' defines term '{term}' more than once")]
    DuplicateTerm { variable: String, term: String },
    #[error("variable '{name}' is already registered")]
    DuplicateVariable { name: String },
    #[error("variable '{variable}', term '{term}': invalid shape parameters {params:?}")]
    InvalidShapeParameters {
        variable: String,
        term: String,
        params: Vec<f64>,
    },
    #[error("invalid universe: min {min}, max {max}, step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },
    #[error("no input bound for antecedent variable '{variable}'")]
    MissingInput { variable: String },
    #[error("variable '{variable}' cannot be used as {expected}")]
    RoleMismatch { variable: String, expected: &'static str },
    #[error("rule base is empty")]
    EmptyRuleBase,
    #[error("rule {rule} has no consequent")]
    EmptyConsequent { rule: usize },
    #[error("session is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// A crisp input fell outside of its variable's universe. Evaluation still
/// proceeds, so this is reported next to the outputs rather than raised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutOfDomain {
    pub variable: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for OutOfDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input {} = {} lies outside of [{}, {}]",
            self.variable, self.value, self.min, self.max
        )
    }
}
