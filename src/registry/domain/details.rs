//! Open key/value details attached to an agent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known detail keys.
pub mod detail_keys {
    /// Free text matched by the selector.
    pub const DESCRIPTION: &str = "description";
    /// Bearer credential for remote API agents. Sealed at rest.
    pub const CREDENTIAL: &str = "credential";
    /// URL receiving remote API requests.
    pub const ENDPOINT: &str = "endpoint";
    /// Path resolved by the handler loader for script and custom agents.
    pub const HANDLER_PATH: &str = "handlerPath";
    /// Command line prefix for shell agents.
    pub const COMMAND: &str = "command";
}

/// String details whose required keys depend on the agent kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentDetails(BTreeMap<String, String>);

impl AgentDetails {
    /// Creates empty details.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a detail, returning the details for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or overwrites a detail, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.0.get_mut(key)
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the description, or an empty string when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        self.get(detail_keys::DESCRIPTION).unwrap_or_default()
    }

    /// Merges `patch` into these details.
    ///
    /// Keys in `patch` are added or overwritten; keys not mentioned are left
    /// untouched. Nothing is ever removed.
    pub fn merge(&mut self, patch: Self) {
        self.0.extend(patch.0);
    }

    /// Iterates details in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of details.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no details.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for AgentDetails {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for AgentDetails
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
