use std::fmt;

use crate::dsl::{Antecedent, Clause};

/// The rule base. Rule ids are 1-based and follow insertion order.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds `IF antecedent THEN consequents` and returns its id. Repeated consequent
    /// clauses are kept once.
    pub fn add(&mut self, antecedent: Antecedent, consequents: impl IntoIterator<Item = Clause>) -> usize {
        let id = self.0.len() + 1;
        let mut unique: Vec<Clause> = Vec::new();

        for clause in consequents {
            if !unique.contains(&clause) {
                unique.push(clause);
            }
        }

        self.0.push(Rule {
            id,
            antecedent,
            consequents: unique,
        });

        id
    }

    pub fn get(&self, id: usize) -> Option<&Rule> {
        id.checked_sub(1).and_then(|i| self.0.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'r> IntoIterator for &'r Rules {
    type Item = &'r Rule;
    type IntoIter = std::slice::Iter<'r, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    id: usize,
    antecedent: Antecedent,
    consequents: Vec<Clause>,
}

impl Rule {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequents(&self) -> &[Clause] {
        &self.consequents
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN ", self.antecedent)?;

        for (i, clause) in self.consequents.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{clause}")?;
        }

        Ok(())
    }
}

#[test]
fn test_rule_ids() {
    use crate::dsl::is;

    let mut rules = Rules::with_capacity(2);
    let first = rules.add(
        is("pollutant", "very high"),
        [Clause::new("air_quality", "hazardous"), Clause::new("recommendation", "stay indoors")],
    );
    let second = rules.add(
        is("pollutant", "low").and(is("temperature", "cold").or(is("temperature", "hot"))),
        [
            Clause::new("air_quality", "fair"),
            Clause::new("air_quality", "Fair"),
            Clause::new("recommendation", "limit outdoor activities"),
        ],
    );

    assert_eq!((first, second), (1, 2));
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.get(0), None);
    assert_eq!(rules.get(2).map(|r| r.consequents().len()), Some(2));
    assert_eq!(
        rules.get(2).unwrap().to_string(),
        "IF pollutant[low] AND (temperature[cold] OR temperature[hot]) \
         THEN air_quality[fair], recommendation[limit outdoor activities]"
    );
}
