use crate::membership::MembershipFunction;

/// The labelled fuzzy sets of one linguistic variable, in declaration order.
/// Duplicate labels are rejected when the terms are attached to a variable.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, label: impl Into<String>, membership: MembershipFunction) {
        self.0.push((label.into(), membership));
    }

    pub fn with(mut self, label: impl Into<String>, membership: MembershipFunction) -> Self {
        self.insert(label, membership);
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
    fn from_iter<It: IntoIterator<Item = (S, MembershipFunction)>>(iter: It) -> Self {
        Self(iter.into_iter().map(|(label, mf)| (label.into(), mf)).collect())
    }
}
