use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, OutOfDomain, Result};
use crate::membership::MembershipFunction;
use crate::terms::{normalize, TermId, Terms};
use crate::universe::Universe;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable consumes crisp inputs or produces crisp outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Antecedent,
    Consequent,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Antecedent => "antecedent",
            Self::Consequent => "consequent",
        }
    }
}

/// A named variable over one universe, with its linguistic terms.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    term_names: Vec<String>,
    memberships: Vec<MembershipFunction>,
    // each membership function sampled over the universe, aligned by TermId
    sampled: Vec<Vec<f64>>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, role: Role, universe: Universe, terms: Terms) -> Result<Self> {
        let name = name.into();
        let mut term_names: Vec<String> = Vec::with_capacity(terms.len());
        let mut memberships = Vec::with_capacity(terms.len());
        let mut sampled = Vec::with_capacity(terms.len());

        for (term, membership) in terms.0 {
            let term = normalize(&term);

            if term_names.contains(&term) {
                return Err(FuzzyError::DuplicateTerm { variable: name, term });
            }

            if !membership.is_valid() {
                return Err(FuzzyError::InvalidShapeParameters {
                    variable: name,
                    term,
                    params: membership.params(),
                });
            }

            sampled.push(membership.sample(universe.samples()));
            memberships.push(membership);
            term_names.push(term);
        }

        Ok(Self {
            name,
            role,
            universe,
            term_names,
            memberships,
            sampled,
        })
    }

    pub fn antecedent(name: impl Into<String>, universe: Universe, terms: Terms) -> Result<Self> {
        Self::new(name, Role::Antecedent, universe, terms)
    }

    pub fn consequent(name: impl Into<String>, universe: Universe, terms: Terms) -> Result<Self> {
        Self::new(name, Role::Consequent, universe, terms)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        let term = normalize(term);

        self.term_names.iter().position(|t| *t == term).map(TermId)
    }

    pub fn term_name(&self, id: TermId) -> &str {
        &self.term_names[id.0]
    }

    pub fn membership(&self, id: TermId) -> &MembershipFunction {
        &self.memberships[id.0]
    }

    /// The term's membership function sampled over the universe.
    pub fn sampled(&self, id: TermId) -> &[f64] {
        &self.sampled[id.0]
    }

    pub fn terms(&self) -> impl Iterator<Item = (TermId, &str, &MembershipFunction)> + '_ {
        self.term_names
            .iter()
            .zip(&self.memberships)
            .enumerate()
            .map(|(i, (name, mf))| (TermId(i), name.as_str(), mf))
    }

    pub fn num_terms(&self) -> usize {
        self.term_names.len()
    }

    /// Degree of `value` in every term. Values outside of the universe are still
    /// evaluated against the shapes, and flagged on the result.
    pub fn fuzzify(&self, value: f64) -> Fuzzified {
        let out_of_domain = if self.universe.contains(value) {
            None
        } else {
            Some(OutOfDomain {
                variable: self.name.clone(),
                value,
                min: self.universe.min(),
                max: self.universe.max(),
            })
        };

        Fuzzified {
            degrees: self.memberships.iter().map(|mf| mf.degree(value)).collect(),
            out_of_domain,
        }
    }

    /// Degree of `value` in the named term.
    pub fn degree(&self, term: &str, value: f64) -> Option<f64> {
        self.term_id(term).map(|id| self.memberships[id.0].degree(value))
    }

    /// The term `value` belongs to the most. Ties go to the earliest registered term, so
    /// a value outside of every term yields the first term with degree 0. `None` only
    /// when the variable has no terms.
    pub fn dominant_term(&self, value: f64) -> Option<(&str, f64)> {
        let mut dominant: Option<(&str, f64)> = None;

        for (_, name, mf) in self.terms() {
            let degree = mf.degree(value);

            if dominant.map_or(true, |(_, d)| degree > d) {
                dominant = Some((name, degree));
            }
        }

        dominant
    }
}

/// One crisp value fuzzified against every term of a variable, indexed by [`TermId`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fuzzified {
    degrees: Vec<f64>,
    out_of_domain: Option<OutOfDomain>,
}

impl Fuzzified {
    pub fn degree(&self, id: TermId) -> f64 {
        self.degrees[id.0]
    }

    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    pub fn out_of_domain(&self) -> Option<&OutOfDomain> {
        self.out_of_domain.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Option<OutOfDomain>) {
        (self.degrees, self.out_of_domain)
    }
}

/// The variable registry. Names are unique.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    pub(crate) slots: SlotMap<VariableKey, LinguisticVariable>,
    by_name: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    pub fn add(&mut self, variable: LinguisticVariable) -> Result<VariableKey> {
        if self.by_name.contains_key(variable.name()) {
            return Err(FuzzyError::DuplicateVariable {
                name: variable.name.clone(),
            });
        }

        let name = variable.name.clone();
        let key = self.slots.insert(variable);

        self.by_name.insert(name, key);

        Ok(key)
    }

    pub fn key(&self, name: &str) -> Option<VariableKey> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.slots.get(key)
    }

    pub fn by_name(&self, name: &str) -> Option<&LinguisticVariable> {
        self.key(name).and_then(|key| self.slots.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable)> {
        self.slots.iter()
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = (VariableKey, &LinguisticVariable)> {
        self.slots.iter().filter(move |(_, var)| var.role == role)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
fn temperature() -> LinguisticVariable {
    LinguisticVariable::antecedent(
        "temperature",
        Universe::from_step(0., 40., 0.1).unwrap(),
        Terms::new()
            .with("cold", MembershipFunction::Trapezoidal(0., 0., 14., 22.))
            .with("Mild", MembershipFunction::Triangular(20., 25., 30.))
            .with("hot", MembershipFunction::Trapezoidal(28., 35., 40., 40.)),
    )
    .unwrap()
}

#[test]
fn test_fuzzify() {
    let temperature = temperature();
    let fuzzified = temperature.fuzzify(21.);
    let mild = temperature.term_id("MILD").unwrap();

    assert_eq!(temperature.term_name(mild), "mild");
    assert_eq!(fuzzified.degrees().len(), 3);
    assert!((fuzzified.degree(TermId(0)) - 0.125).abs() < 1e-12);
    assert!((fuzzified.degree(mild) - 0.2).abs() < 1e-12);
    assert_eq!(fuzzified.degree(TermId(2)), 0.);
    assert!(fuzzified.out_of_domain().is_none());
    assert_eq!(temperature.sampled(mild).len(), temperature.universe().len());
}

#[test]
fn test_fuzzify_out_of_domain() {
    let temperature = temperature();
    let fuzzified = temperature.fuzzify(-5.);
    let warning = fuzzified.out_of_domain().unwrap();

    assert_eq!(warning.variable, "temperature");
    assert_eq!(warning.value, -5.);
    assert_eq!(warning.min, 0.);
    assert!(fuzzified.degrees().iter().all(|d| *d == 0.));
}

#[test]
fn test_dominant_term() {
    let temperature = temperature();

    assert_eq!(temperature.dominant_term(25.), Some(("mild", 1.)));
    assert_eq!(temperature.dominant_term(38.).map(|(t, _)| t), Some("hot"));
    assert_eq!(temperature.dominant_term(-10.), Some(("cold", 0.)));

    let bare = LinguisticVariable::consequent("empty", Universe::from_count(0., 1., 2).unwrap(), Terms::new()).unwrap();

    assert_eq!(bare.dominant_term(0.5), None);
}

#[test]
fn test_duplicate_term() {
    let result = LinguisticVariable::antecedent(
        "humidity",
        Universe::from_step(0., 100., 1.).unwrap(),
        Terms::new()
            .with("dry", MembershipFunction::Trapezoidal(0., 0., 30., 45.))
            .with(" DRY", MembershipFunction::Triangular(35., 55., 75.)),
    );

    assert!(matches!(
        result,
        Err(FuzzyError::DuplicateTerm { ref variable, ref term }) if variable == "humidity" && term == "dry"
    ));
}

#[test]
fn test_invalid_shape() {
    let result = LinguisticVariable::consequent(
        "air_quality",
        Universe::from_step(0., 100., 1.).unwrap(),
        Terms::new().with("fair", MembershipFunction::Triangular(70., 50., 30.)),
    );

    assert!(matches!(
        result,
        Err(FuzzyError::InvalidShapeParameters { ref term, ref params, .. }) if term == "fair" && params.len() == 3
    ));
}

#[test]
fn test_registry() {
    let mut vars = Variables::new();
    let key = vars.add(temperature()).unwrap();

    assert_eq!(vars.key("temperature"), Some(key));
    assert_eq!(vars.get(key).map(|v| v.role()), Some(Role::Antecedent));
    assert_eq!(vars.with_role(Role::Consequent).count(), 0);
    assert!(matches!(
        vars.add(temperature()),
        Err(FuzzyError::DuplicateVariable { ref name }) if name == "temperature"
    ));
    assert_eq!(vars.len(), 1);
}
