//! Identifier to display-label mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maps opaque stat and zone identifiers to human-readable labels.
///
/// Built once at startup and shared by reference. Identifiers that are not
/// in the map resolve to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameMap {
    labels: BTreeMap<String, String>,
}

impl NameMap {
    pub fn new(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }

    /// Label for `identifier`, or the identifier itself when unmapped.
    pub fn resolve<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.labels
            .get(identifier)
            .map(String::as_str)
            .unwrap_or(identifier)
    }

    /// All mapped identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(String, String)> for NameMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}
