//! Declarative configuration: a serde table of variables and rules that resolves
//! into an [`InferenceEngine`].
//!
//! ```json
//! {
//!   "variables": [
//!     {"name": "pollutant", "role": "antecedent", "min": 0, "max": 200, "step": 0.1,
//!      "terms": [{"name": "low", "shape": {"type": "triangular", "points": [0, 0, 30]}}]}
//!   ],
//!   "rules": [
//!     {"if": {"and": [{"is": ["pollutant", "low"]}, {"is": ["humidity", "dry"]}]},
//!      "then": [["air_quality", "fair"]]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dsl::{Antecedent, Clause};
use crate::error::Result;
use crate::inference::InferenceEngine;
use crate::membership::MembershipFunction;
use crate::rules::Rules;
use crate::terms::Terms;
use crate::universe::Universe;
use crate::variable::{LinguisticVariable, Role, Variables};

/// Evaluation knobs that don't change the inference method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Clamp out of domain inputs to the universe bounds before fuzzifying them.
    /// They are reported either way.
    pub clip_inputs: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub options: EngineOptions,
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<RuleConfig>,
}

fn default_step() -> f64 {
    0.1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub role: Role,
    pub min: f64,
    pub max: f64,
    /// Defaults to 0.1
    #[serde(default = "default_step")]
    pub step: f64,
    pub terms: Vec<TermConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub shape: MembershipFunction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntecedentConfig {
    Is(String, String),
    And(Box<AntecedentConfig>, Box<AntecedentConfig>),
    Or(Box<AntecedentConfig>, Box<AntecedentConfig>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(rename = "if")]
    pub antecedent: AntecedentConfig,
    #[serde(rename = "then")]
    pub consequents: Vec<(String, String)>,
}

impl From<&AntecedentConfig> for Antecedent {
    fn from(config: &AntecedentConfig) -> Self {
        match config {
            AntecedentConfig::Is(variable, term) => Antecedent::Is(Clause::new(variable.as_str(), term)),
            AntecedentConfig::And(lhs, rhs) => Antecedent::from(&**lhs).and(Antecedent::from(&**rhs)),
            AntecedentConfig::Or(lhs, rhs) => Antecedent::from(&**lhs).or(Antecedent::from(&**rhs)),
        }
    }
}

impl VariableConfig {
    pub fn build(&self) -> Result<LinguisticVariable> {
        let universe = Universe::from_step(self.min, self.max, self.step)?;
        let terms = self.terms.iter().map(|t| (t.name.as_str(), t.shape)).collect::<Terms>();

        LinguisticVariable::new(self.name.as_str(), self.role, universe, terms)
    }
}

impl SystemConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves the table and builds the engine, with the same validation as
    /// [`InferenceEngine::build`].
    pub fn build(&self) -> Result<InferenceEngine> {
        let mut variables = Variables::new();

        for var in &self.variables {
            variables.add(var.build()?)?;
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            rules.add(
                Antecedent::from(&rule.antecedent),
                rule.consequents
                    .iter()
                    .map(|(variable, term)| Clause::new(variable.as_str(), term)),
            );
        }

        InferenceEngine::build_with_options(variables, rules, self.options)
    }
}

#[cfg(test)]
const TIPPING: &str = r#"{
    "variables": [
        {"name": "service", "role": "antecedent", "min": 0, "max": 10,
         "terms": [
            {"name": "poor", "shape": {"type": "triangular", "points": [0, 0, 5]}},
            {"name": "Good", "shape": {"type": "triangular", "points": [5, 10, 10]}}
         ]},
        {"name": "food", "role": "antecedent", "min": 0, "max": 10, "step": 0.5,
         "terms": [
            {"name": "rancid", "shape": {"type": "trapezoidal", "points": [0, 0, 2, 5]}},
            {"name": "delicious", "shape": {"type": "trapezoidal", "points": [5, 8, 10, 10]}}
         ]},
        {"name": "tip", "role": "consequent", "min": 0, "max": 25, "step": 0.5,
         "terms": [
            {"name": "low", "shape": {"type": "triangular", "points": [0, 0, 13]}},
            {"name": "high", "shape": {"type": "triangular", "points": [13, 25, 25]}}
         ]}
    ],
    "rules": [
        {"if": {"or": [{"is": ["service", "poor"]}, {"is": ["food", "rancid"]}]}, "then": [["tip", "low"]]},
        {"if": {"and": [{"is": ["service", "good"]}, {"is": ["food", "delicious"]}]}, "then": [["tip", "HIGH"]]}
    ]
}"#;

#[test]
fn test_build_from_json() {
    use crate::inputs::Inputs;

    let config = SystemConfig::from_json(TIPPING).unwrap();

    assert_eq!(config.variables[0].step, 0.1);
    assert_eq!(config.options, EngineOptions::default());

    let engine = config.build().unwrap();

    assert_eq!(engine.variables().len(), 3);
    assert_eq!(engine.variable("food").unwrap().universe().len(), 21);
    assert_eq!(
        engine.rules().get(1).unwrap().to_string(),
        "IF service[poor] OR food[rancid] THEN tip[low]"
    );

    let generous = engine
        .evaluate(&Inputs::new().with("service", 9.).with("food", 9.))
        .unwrap();
    let stingy = engine
        .evaluate(&Inputs::new().with("service", 1.).with("food", 1.))
        .unwrap();

    assert!(generous.value("tip").unwrap() > stingy.value("tip").unwrap());
    assert_eq!(generous.activated_rules(), vec![2]);
    assert_eq!(stingy.activated_rules(), vec![1]);
}

#[test]
fn test_config_errors() {
    use crate::error::FuzzyError;

    assert!(matches!(SystemConfig::from_json("{\"variables\": 3}"), Err(FuzzyError::Config(_))));

    let mut config = SystemConfig::from_json(TIPPING).unwrap();

    config.rules[1].consequents.push(("tip".to_owned(), "generous".to_owned()));

    assert!(matches!(
        config.build(),
        Err(FuzzyError::UnknownClause { rule: 2, ref variable, ref term }) if variable == "tip" && term == "generous"
    ));

    let mut config = SystemConfig::from_json(TIPPING).unwrap();

    config.variables[2].terms[1].name = "LOW".to_owned();

    assert!(matches!(config.build(), Err(FuzzyError::DuplicateTerm { .. })));

    let mut config = SystemConfig::from_json(TIPPING).unwrap();

    config.variables[0].step = -1.;

    assert!(matches!(config.build(), Err(FuzzyError::InvalidUniverse { .. })));

    let mut config = SystemConfig::from_json(TIPPING).unwrap();

    config.variables[1].max = 1e15;
    config.variables[1].step = 0.001;

    assert!(matches!(config.build(), Err(FuzzyError::InvalidUniverse { .. })));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SystemConfig::from_json(TIPPING).unwrap();
    let reparsed = SystemConfig::from_json(&config.to_json().unwrap()).unwrap();

    assert_eq!(reparsed, config);
}
