use std::collections::BTreeSet;

/// The person making a request, with the capabilities granted to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub name: String,
    capabilities: BTreeSet<String>,
}

impl User {
    pub fn new<I, S>(name: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    /// A visitor holding no capabilities.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}
