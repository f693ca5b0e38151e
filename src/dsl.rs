use std::fmt;

use crate::error::{FuzzyError, Result};
use crate::ops;
use crate::terms::normalize;

/// A `(variable, term)` pair. Only a key: it is resolved against the variable registry
/// when the engine is built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, term: &str) -> Self {
        Self {
            variable: variable.into(),
            term: normalize(term),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.variable, self.term)
    }
}

/// The premise of a rule: clauses combined with Zadeh AND (min) and OR (max).
#[derive(Clone, Debug, PartialEq)]
pub enum Antecedent {
    Is(Clause),
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

/// `variable is term`
pub fn is(variable: impl Into<String>, term: &str) -> Antecedent {
    Antecedent::Is(Clause::new(variable, term))
}

impl Antecedent {
    pub fn and(self, rhs: Antecedent) -> Self {
        Antecedent::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Antecedent) -> Self {
        Antecedent::Or(Box::new(self), Box::new(rhs))
    }

    /// Every clause in the tree, left to right.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut clauses = Vec::new();

        fn collect<'a>(expr: &'a Antecedent, out: &mut Vec<&'a Clause>) {
            match expr {
                Antecedent::Is(clause) => out.push(clause),
                Antecedent::And(lhs, rhs) | Antecedent::Or(lhs, rhs) => {
                    collect(lhs, out);
                    collect(rhs, out);
                },
            }
        }

        collect(self, &mut clauses);

        clauses
    }

    /// Truth degree of the tree given each clause's degree. A clause `degree` has no
    /// value for is reported as [`FuzzyError::UnknownClause`].
    pub fn evaluate<D>(&self, degree: &D) -> Result<f64>
    where
        D: Fn(&Clause) -> Option<f64>,
    {
        match self {
            Antecedent::Is(clause) => degree(clause).ok_or_else(|| FuzzyError::UnknownClause {
                rule: 0,
                variable: clause.variable.clone(),
                term: clause.term.clone(),
            }),
            Antecedent::And(lhs, rhs) => Ok(ops::and(lhs.evaluate(degree)?, rhs.evaluate(degree)?)),
            Antecedent::Or(lhs, rhs) => Ok(ops::or(lhs.evaluate(degree)?, rhs.evaluate(degree)?)),
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // parenthesize a compound operand only when its operator differs from the parent's
        fn operand(f: &mut fmt::Formatter<'_>, parent: &Antecedent, child: &Antecedent) -> fmt::Result {
            let same_op = matches!(
                (parent, child),
                (Antecedent::And(..), Antecedent::And(..)) | (Antecedent::Or(..), Antecedent::Or(..))
            );

            match child {
                Antecedent::Is(_) => write!(f, "{child}"),
                _ if same_op => write!(f, "{child}"),
                _ => write!(f, "({child})"),
            }
        }

        match self {
            Antecedent::Is(clause) => write!(f, "{clause}"),
            Antecedent::And(lhs, rhs) | Antecedent::Or(lhs, rhs) => {
                let op = if matches!(self, Antecedent::And(..)) { "AND" } else { "OR" };

                operand(f, self, lhs)?;
                write!(f, " {op} ")?;
                operand(f, self, rhs)
            },
        }
    }
}

#[cfg(test)]
fn degrees(clause: &Clause) -> Option<f64> {
    match (clause.variable.as_str(), clause.term.as_str()) {
        ("pollutant", "low") => Some(0.8),
        ("temperature", "cold") => Some(0.1),
        ("temperature", "hot") => Some(0.3),
        ("humidity", "dry") => Some(0.5),
        _ => None,
    }
}

#[test]
fn test_evaluate() {
    let expr = is("pollutant", "low").and(is("temperature", "cold").or(is("temperature", "hot")));

    assert_eq!(expr.evaluate(&degrees).unwrap(), 0.3);

    let expr = is("pollutant", "low").or(is("humidity", "dry")).and(is("temperature", "cold"));

    assert_eq!(expr.evaluate(&degrees).unwrap(), 0.1);
    assert_eq!(is("Pollutant", "LOW").evaluate(&|_: &Clause| Some(0.4)).unwrap(), 0.4);
}

#[test]
fn test_evaluate_unknown_clause() {
    let expr = is("pollutant", "low").and(is("pollutant", "Extreme"));

    assert!(matches!(
        expr.evaluate(&degrees),
        Err(FuzzyError::UnknownClause { ref variable, ref term, .. }) if variable == "pollutant" && term == "extreme"
    ));
}

#[test]
fn test_clauses() {
    let expr = is("pollutant", "low").and(is("temperature", "cold").or(is("temperature", "hot")));
    let clauses: Vec<String> = expr.clauses().iter().map(|c| c.to_string()).collect();

    assert_eq!(clauses, ["pollutant[low]", "temperature[cold]", "temperature[hot]"]);
}

#[test]
fn test_display() {
    let expr = is("pollutant", "low")
        .and(is("temperature", "mild"))
        .and(is("humidity", "comfortable"));

    assert_eq!(
        expr.to_string(),
        "pollutant[low] AND temperature[mild] AND humidity[comfortable]"
    );

    let expr = is("pollutant", "moderate").and(is("humidity", "dry").or(is("humidity", "humid")));

    assert_eq!(
        expr.to_string(),
        "pollutant[moderate] AND (humidity[dry] OR humidity[humid])"
    );
}
