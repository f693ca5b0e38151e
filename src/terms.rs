use crate::membership::MembershipFunction;

/// Index of a term within its variable, resolved once when the engine is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) usize);

impl TermId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Term names are matched case-insensitively and without surrounding whitespace.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The linguistic terms of a variable, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, membership: MembershipFunction) {
        self.0.push((name.into(), membership));
    }

    pub fn with(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        self.insert(name, membership);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, MembershipFunction)> for Terms {
    fn from_iter<I: IntoIterator<Item = (S, MembershipFunction)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, mf)| (name.into(), mf)).collect())
    }
}

#[test]
fn test_normalize() {
    assert_eq!(normalize("  Very High "), "very high");
    assert_eq!(normalize("STAY indoors"), "stay indoors");
}
