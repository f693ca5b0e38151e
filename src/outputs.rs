use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::OutOfDomain;

/// A defuzzified output. `Undefined` when no rule touching the variable fired,
/// leaving an empty aggregated set with no centroid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Crisp {
    Defined(f64),
    Undefined,
}

impl Crisp {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// The crisp value, or `default` when undefined.
    pub fn unwrap_or(self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }
}

/// Firing strength of one rule during an evaluation. `activated` is set when the
/// strength is above 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    pub rule: usize,
    pub strength: f64,
    pub activated: bool,
}

impl RuleActivation {
    pub fn new(rule: usize, strength: f64) -> Self {
        Self {
            rule,
            strength,
            activated: strength > 0.,
        }
    }
}

/// The result of one evaluation: crisp outputs, the rule trace and the
/// intermediate fuzzy sets reporting layers need.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub(crate) crisp: HashMap<String, Crisp>,
    pub(crate) aggregated: HashMap<String, Vec<f64>>,
    pub(crate) fuzzified: HashMap<String, Vec<(String, f64)>>,
    pub(crate) trace: Vec<RuleActivation>,
    pub(crate) warnings: Vec<OutOfDomain>,
}

impl Outputs {
    pub fn crisp(&self, variable: &str) -> Option<Crisp> {
        self.crisp.get(variable).copied()
    }

    /// Shorthand for a defined crisp output.
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.crisp(variable).and_then(Crisp::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Crisp)> {
        self.crisp.iter().map(|(name, crisp)| (name.as_str(), *crisp))
    }

    /// The aggregated set of an output variable, aligned with its universe.
    pub fn aggregated(&self, variable: &str) -> Option<&[f64]> {
        self.aggregated.get(variable).map(Vec::as_slice)
    }

    /// Per-term degrees of an input variable, in term order.
    pub fn fuzzified(&self, variable: &str) -> Option<&[(String, f64)]> {
        self.fuzzified.get(variable).map(Vec::as_slice)
    }

    /// One entry per rule, in rule order.
    pub fn trace(&self) -> &[RuleActivation] {
        &self.trace
    }

    pub fn firing_strength(&self, rule: usize) -> Option<f64> {
        self.trace.iter().find(|a| a.rule == rule).map(|a| a.strength)
    }

    /// Ids of the rules with a non-zero firing strength.
    pub fn activated_rules(&self) -> Vec<usize> {
        self.trace
            .iter()
            .filter(|a| a.activated)
            .map(|a| a.rule)
            .collect()
    }

    pub fn warnings(&self) -> &[OutOfDomain] {
        &self.warnings
    }
}

#[test]
fn test_crisp() {
    assert_eq!(Crisp::Defined(17.5).value(), Some(17.5));
    assert_eq!(Crisp::Undefined.value(), None);
    assert_eq!(Crisp::Undefined.unwrap_or(50.), 50.);
    assert!(!Crisp::Undefined.is_defined());
}

#[test]
fn test_activated_rules() {
    let outputs = Outputs {
        trace: vec![
            RuleActivation::new(1, 0.),
            RuleActivation::new(2, 0.2),
            RuleActivation::new(3, 0.14),
        ],
        ..Outputs::default()
    };

    assert_eq!(outputs.activated_rules(), vec![2, 3]);
    assert_eq!(outputs.firing_strength(3), Some(0.14));
    assert_eq!(outputs.firing_strength(4), None);
}

#[test]
fn test_trace_serializes_activation_flag() {
    let json = serde_json::to_value(RuleActivation::new(10, 1.)).unwrap();

    assert_eq!(json["rule"], 10);
    assert_eq!(json["activated"], true);
    assert_eq!(serde_json::to_value(RuleActivation::new(3, 0.)).unwrap()["activated"], false);
}
