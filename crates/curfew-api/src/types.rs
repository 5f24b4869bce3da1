//! Groups, the policy document, and related types

use curfew_util::{CurfewError, CurfewResult, GroupName};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::{DaySelection, HourSelection};

/// Scheme prefixes stripped from domains
const SCHEMES: [&str; 2] = ["http://", "https://"];

/// A named bundle of domains plus the window during which they are blocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub hours: HourSelection,
    pub days: DaySelection,
    /// Normalized on load, like domains added through the engine
    #[serde(deserialize_with = "deserialize_domains")]
    pub domains: BTreeSet<String>,
}

impl Default for Group {
    /// Live every hour of every day, blocking nothing yet.
    fn default() -> Self {
        Self {
            hours: HourSelection::any(),
            days: DaySelection::any(),
            domains: BTreeSet::new(),
        }
    }
}

/// The persisted policy: every group, plus which ones are enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Enabled group names. May name groups that no longer exist.
    #[serde(default)]
    pub active: BTreeSet<GroupName>,

    /// Names that differ only in case are rejected on load.
    #[serde(default, deserialize_with = "deserialize_groups")]
    pub groups: BTreeMap<GroupName, Group>,
}

impl PolicyDocument {
    /// The document written on first use: an active, empty `default` group.
    pub fn initial() -> Self {
        let default = GroupName::default_group();
        Self {
            active: BTreeSet::from([default.clone()]),
            groups: BTreeMap::from([(default, Group::default())]),
        }
    }

    pub fn group(&self, name: &GroupName) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn is_active(&self, name: &GroupName) -> bool {
        self.active.contains(name)
    }

    /// Put back an active, wildcard `default` group if the document lacks
    /// one. Returns whether it was added.
    pub fn restore_default(&mut self) -> bool {
        let default = GroupName::default_group();
        if self.groups.contains_key(&default) {
            return false;
        }
        self.groups.insert(default.clone(), Group::default());
        self.active.insert(default);
        true
    }
}

fn deserialize_domains<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeSet<String>, D::Error> {
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|raw| normalize_domain(raw).map_err(D::Error::custom))
        .collect()
}

fn deserialize_groups<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<GroupName, Group>, D::Error> {
    let raw = BTreeMap::<String, Group>::deserialize(deserializer)?;

    let mut groups = BTreeMap::new();
    for (key, group) in raw {
        let name = GroupName::new(&key);
        if name.is_empty() {
            return Err(D::Error::custom("group name cannot be empty"));
        }
        if groups.insert(name.clone(), group).is_some() {
            return Err(D::Error::custom(format!(
                "group '{}' is stored under more than one spelling",
                name
            )));
        }
    }
    Ok(groups)
}

/// Group field addressed by empty/remove operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Domains,
    Hours,
    Days,
}

impl FromStr for FieldKind {
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "domain" | "domains" => Ok(FieldKind::Domains),
            "hour" | "hours" => Ok(FieldKind::Hours),
            "day" | "days" => Ok(FieldKind::Days),
            other => Err(CurfewError::validation(format!(
                "Unknown group field '{}': expected domains, hours or days",
                other
            ))),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Domains => "domains",
            FieldKind::Hours => "hours",
            FieldKind::Days => "days",
        })
    }
}

/// Normalize a domain as entered by a user.
///
/// Lowercases, strips a leading `http://`/`https://` and anything from the
/// first `/` on. No other syntax checking is done.
pub fn normalize_domain(raw: &str) -> CurfewResult<String> {
    let lowered = raw.trim().to_lowercase();
    let mut domain = lowered.as_str();
    for scheme in SCHEMES {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest;
            break;
        }
    }
    let domain = domain.split('/').next().unwrap_or_default();

    if domain.is_empty() {
        return Err(CurfewError::validation(format!(
            "Invalid domain '{}': nothing left after removing the scheme",
            raw
        )));
    }
    Ok(domain.to_string())
}

/// Answer to a yes/no/quit prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    /// Skip this one operation
    No,
    /// Stop the whole process without writing
    Quit,
}

impl FromStr for Confirmation {
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Confirmation::Yes),
            "n" | "no" => Ok(Confirmation::No),
            "q" | "quit" => Ok(Confirmation::Quit),
            other => Err(CurfewError::validation(format!(
                "Input '{}' not recognized, answer y, n or quit",
                other
            ))),
        }
    }
}

/// Listing of one group and its status at a given instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub name: GroupName,
    /// In the active list
    pub active: bool,
    /// Day and hour window matches the instant
    pub live: bool,
    pub hours: Vec<String>,
    pub days: Vec<String>,
    pub domains: Vec<String>,
}

impl GroupView {
    pub fn from_group(name: &GroupName, group: &Group, active: bool, live: bool) -> Self {
        Self {
            name: name.clone(),
            active,
            live,
            hours: group.hours.tokens(),
            days: group.days.tokens(),
            domains: group.domains.iter().cloned().collect(),
        }
    }

    /// Currently contributing domains to the hosts file.
    pub fn running(&self) -> bool {
        self.active && self.live
    }
}
