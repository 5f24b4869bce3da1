//! Wildcard-or-concrete selections
//!
//! A group's hours and days are either the wildcard or a set of concrete
//! specs, never a mix. Concrete sets are kept deduplicated and sorted by
//! their token text so the stored document and the generated hosts file
//! are deterministic.

use curfew_util::CurfewError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::WILDCARD;

/// A single rule entry: the wildcard or one concrete value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec<T> {
    Wildcard,
    Value(T),
}

impl<T> FromStr for Spec<T>
where
    T: FromStr<Err = CurfewError>,
{
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == WILDCARD {
            Ok(Spec::Wildcard)
        } else {
            s.parse().map(Spec::Value)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Spec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Wildcard => f.write_str(WILDCARD),
            Spec::Value(v) => v.fmt(f),
        }
    }
}

/// Either every value, or an explicit (possibly empty) set of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Any,
    Only(Vec<T>),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Any
    }
}

impl<T> Selection<T>
where
    T: fmt::Display + PartialEq,
{
    pub fn any() -> Self {
        Selection::Any
    }

    /// An explicit selection with nothing in it. Matches nothing.
    pub fn none() -> Self {
        Selection::Only(Vec::new())
    }

    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        let mut values: Vec<T> = values.into_iter().collect();
        normalize(&mut values);
        Selection::Only(values)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Selection::Any)
    }

    /// Concrete values; empty for the wildcard.
    pub fn values(&self) -> &[T] {
        match self {
            Selection::Any => &[],
            Selection::Only(values) => values,
        }
    }

    /// True for the wildcard, otherwise true iff any concrete value passes.
    pub fn matches(&self, pred: impl Fn(&T) -> bool) -> bool {
        match self {
            Selection::Any => true,
            Selection::Only(values) => values.iter().any(pred),
        }
    }

    /// Add a spec. The wildcard replaces everything; a concrete value
    /// replaces the wildcard rather than joining it.
    ///
    /// Returns whether the selection changed.
    pub fn add(&mut self, spec: Spec<T>) -> bool {
        match spec {
            Spec::Wildcard => {
                if self.is_any() {
                    return false;
                }
                *self = Selection::Any;
                true
            }
            Spec::Value(value) => match self {
                Selection::Any => {
                    *self = Selection::Only(vec![value]);
                    true
                }
                Selection::Only(values) => {
                    if values.contains(&value) {
                        return false;
                    }
                    values.push(value);
                    normalize(values);
                    true
                }
            },
        }
    }

    /// Remove a spec if present. Removing the wildcard leaves an empty
    /// explicit selection.
    pub fn remove(&mut self, spec: &Spec<T>) -> bool {
        match spec {
            Spec::Wildcard => {
                if !self.is_any() {
                    return false;
                }
                *self = Selection::none();
                true
            }
            Spec::Value(value) => match self {
                Selection::Any => false,
                Selection::Only(values) => {
                    let before = values.len();
                    values.retain(|v| v != value);
                    values.len() != before
                }
            },
        }
    }

    /// Empty the selection. The result matches nothing, unlike the wildcard.
    pub fn clear(&mut self) -> bool {
        if matches!(self, Selection::Only(values) if values.is_empty()) {
            return false;
        }
        *self = Selection::none();
        true
    }

    /// Token form used in the document and in listings.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Selection::Any => vec![WILDCARD.to_string()],
            Selection::Only(values) => values.iter().map(ToString::to_string).collect(),
        }
    }

    /// Parse a stored token list. A list containing the wildcard anywhere
    /// collapses to the wildcard.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, CurfewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: FromStr<Err = CurfewError>,
    {
        let mut values = Vec::new();
        for token in tokens {
            match token.as_ref().parse::<Spec<T>>()? {
                Spec::Wildcard => return Ok(Selection::Any),
                Spec::Value(value) => values.push(value),
            }
        }
        normalize(&mut values);
        Ok(Selection::Only(values))
    }
}

fn normalize<T: fmt::Display + PartialEq>(values: &mut Vec<T>) {
    values.sort_by_cached_key(ToString::to_string);
    values.dedup();
}

impl<T> Serialize for Selection<T>
where
    T: fmt::Display + PartialEq,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tokens().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr<Err = CurfewError> + fmt::Display + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        Selection::from_tokens(tokens).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DaySpec, HourSpec};
    use chrono::Weekday;

    fn hour(s: &str) -> Spec<HourSpec> {
        s.parse().unwrap()
    }

    #[test]
    fn wildcard_replaces_concrete_specs() {
        let mut hours = Selection::only([HourSpec::At(8), HourSpec::Range { start: 9, end: 17 }]);
        assert!(hours.add(Spec::Wildcard));
        assert_eq!(hours, Selection::Any);
        assert_eq!(hours.tokens(), vec!["*"]);
    }

    #[test]
    fn concrete_spec_replaces_wildcard() {
        let mut hours: Selection<HourSpec> = Selection::any();
        assert!(hours.add(hour("9-17")));
        assert_eq!(hours.tokens(), vec!["9-17"]);
    }

    #[test]
    fn concrete_specs_are_deduplicated_and_sorted_as_text() {
        let mut hours: Selection<HourSpec> = Selection::none();
        hours.add(hour("9"));
        hours.add(hour("10"));
        assert!(!hours.add(hour("9")));
        assert_eq!(hours.tokens(), vec!["10", "9"]);
    }

    #[test]
    fn removing_wildcard_leaves_empty_selection() {
        let mut days: Selection<DaySpec> = Selection::any();
        assert!(days.remove(&Spec::Wildcard));
        assert!(days.values().is_empty());
        assert!(!days.matches(|d| d.matches(Weekday::Mon)));
    }

    #[test]
    fn remove_absent_value_is_noop() {
        let mut days = Selection::only([DaySpec::new(Weekday::Mon)]);
        assert!(!days.remove(&Spec::Value(DaySpec::new(Weekday::Tue))));
        assert_eq!(days.tokens(), vec!["Monday"]);
    }

    #[test]
    fn clear_is_not_wildcard() {
        let mut hours: Selection<HourSpec> = Selection::any();
        assert!(hours.clear());
        assert!(!hours.is_any());
        assert!(!hours.matches(|h| h.matches(12)));
        assert!(!hours.clear());
    }

    #[test]
    fn serde_uses_token_lists() {
        let hours: Selection<HourSpec> = serde_json::from_str(r#"["9-17", "8"]"#).unwrap();
        assert_eq!(serde_json::to_string(&hours).unwrap(), r#"["8","9-17"]"#);

        let mixed: Selection<HourSpec> = serde_json::from_str(r#"["8", "*"]"#).unwrap();
        assert_eq!(mixed, Selection::Any);

        let bad: Result<Selection<DaySpec>, _> = serde_json::from_str(r#"["Caturday"]"#);
        assert!(bad.is_err());
    }
}
