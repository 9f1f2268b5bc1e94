use serde::{Deserialize, Serialize};

/// Game names a user has picked across several submissions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSelection {
    /// Raw names in first-submitted order, no exact duplicates
    pub names: Vec<String>,
}

impl UserSelection {
    /// Creates an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from stored names, dropping exact repeats
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        selection.extend(names);
        selection
    }

    /// Adds a name unless an identical string is already present
    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    /// Adds every name in order
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add(name);
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One submit action: a free-text entry and/or checked suggestions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionSubmission {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl SelectionSubmission {
    /// Names to append, free text first. Blank entries are dropped.
    pub fn entries(self) -> Vec<String> {
        self.text
            .map(|t| t.trim().to_string())
            .into_iter()
            .chain(self.suggestions)
            .filter(|name| !name.trim().is_empty())
            .collect()
    }
}
