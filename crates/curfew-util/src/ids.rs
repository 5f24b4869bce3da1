//! Strongly-typed identifiers for curfew

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the group that always exists
pub const DEFAULT_GROUP: &str = "default";

/// Name of a policy group, always stored lowercase
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn default_group() -> Self {
        Self(DEFAULT_GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GroupName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for GroupName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<GroupName> for String {
    fn from(name: GroupName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_are_lowercased() {
        assert_eq!(GroupName::new("  Work ").as_str(), "work");
        assert_eq!(GroupName::from("DEFAULT"), GroupName::default_group());
    }

    #[test]
    fn group_name_serde_normalizes() {
        let name: GroupName = serde_json::from_str("\"Evening\"").unwrap();
        assert_eq!(name.as_str(), "evening");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"evening\"");
    }
}
