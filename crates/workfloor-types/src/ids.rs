//! Agent identifiers.
//!
//! Agents are addressed by human-readable slugs (`trade-master`,
//! `full-stack`) because the event feed mentions them by name in free text.
//! The wrapper keeps them from being mixed up with message bodies or
//! destination names.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an agent in the office.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct AgentId(pub String);

impl AgentId {
    /// Create an identifier from anything string-like.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(slug: &str) -> Self {
        Self(slug.to_owned())
    }
}

impl From<String> for AgentId {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

impl Borrow<str> for AgentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(AgentId::from("full-stack"), 1_u32);
        assert_eq!(map.get("full-stack"), Some(&1));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&AgentId::new("trade-master")).unwrap_or_default();
        assert_eq!(json, "\"trade-master\"");
    }
}
