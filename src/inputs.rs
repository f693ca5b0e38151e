use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Crisp values for the antecedent variables, by variable name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(pub(crate) HashMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, variable: impl Into<String>, val: f64) {
        self.0.insert(variable.into(), val);
    }

    pub fn with(mut self, variable: impl Into<String>, val: f64) -> Self {
        self.add(variable, val);
        self
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Inputs(iter.into_iter().map(|(name, val)| (name.into(), val)).collect())
    }
}

#[test]
fn test_inputs() {
    let inputs: Inputs = [("pollutant", 5.), ("temperature", 23.)].into_iter().collect();
    let inputs = inputs.with("humidity", 50.);

    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs.get("temperature"), Some(23.));
    assert_eq!(inputs.get("wind"), None);

    let decoded: Inputs = serde_json::from_str(r#"{"pollutant": 5, "temperature": 23, "humidity": 50}"#).unwrap();

    assert_eq!(decoded, inputs);
}
