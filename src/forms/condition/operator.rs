// SPDX-License-Identifier: MIT

//! Comparison operators for visibility conditions
//!
//! Operators travel over the wire as snake_case strings. Parsing is total:
//! a string the engine does not recognize becomes [`Operator::Unknown`] and
//! keeps its raw text, so a definition written by a newer builder still
//! round-trips byte for byte.

use serde::{Deserialize, Serialize};

/// Comparison operators supported by the visibility engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Exact string equality
    Equals,
    /// Negation of Equals
    NotEquals,
    /// Substring match on text, membership on multi-selections
    Contains,
    /// Negation of Contains
    DoesNotContain,
    /// Answer absent, blank, unchecked, or an empty selection
    IsEmpty,
    /// Negation of IsEmpty
    IsNotEmpty,
    /// Answer intersects the allowed set
    IsAnyOf,
    /// Negation of IsAnyOf
    IsNotAnyOf,
    /// Multi-selection covers every required value
    IsEveryOf,
    /// Calendar date strictly before the comparison date
    Before,
    /// Calendar date on or before the comparison date
    BeforeOrEqual,
    /// Calendar date strictly after the comparison date
    After,
    /// Calendar date on or after the comparison date
    AfterOrEqual,
    /// Operator string this engine does not recognize; evaluates fail-open
    Unknown(String),
}

impl Operator {
    /// Parse an operator from its wire representation. Never fails:
    /// unrecognized strings land in [`Operator::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "does_not_contain" => Operator::DoesNotContain,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            "is_any_of" => Operator::IsAnyOf,
            "is_not_any_of" => Operator::IsNotAnyOf,
            "is_every_of" => Operator::IsEveryOf,
            "before" => Operator::Before,
            "before_or_equal" => Operator::BeforeOrEqual,
            "after" => Operator::After,
            "after_or_equal" => Operator::AfterOrEqual,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Wire representation of the operator
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does_not_contain",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IsAnyOf => "is_any_of",
            Operator::IsNotAnyOf => "is_not_any_of",
            Operator::IsEveryOf => "is_every_of",
            Operator::Before => "before",
            Operator::BeforeOrEqual => "before_or_equal",
            Operator::After => "after",
            Operator::AfterOrEqual => "after_or_equal",
            Operator::Unknown(raw) => raw,
        }
    }

    /// True for is_empty / is_not_empty, which ignore the comparison value
    pub fn checks_emptiness(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// True for the set operators, which compare against a list of values
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            Operator::IsAnyOf | Operator::IsNotAnyOf | Operator::IsEveryOf
        )
    }

    /// True for the calendar date comparisons
    pub fn compares_dates(&self) -> bool {
        matches!(
            self,
            Operator::Before | Operator::BeforeOrEqual | Operator::After | Operator::AfterOrEqual
        )
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        Operator::parse(&raw)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Definition files describe operators as plain strings.
impl schemars::JsonSchema for Operator {
    fn schema_name() -> String {
        "Operator".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(format!("{}", Operator::Equals), "equals");
        assert_eq!(format!("{}", Operator::NotEquals), "not_equals");
        assert_eq!(format!("{}", Operator::Contains), "contains");
        assert_eq!(format!("{}", Operator::DoesNotContain), "does_not_contain");
        assert_eq!(format!("{}", Operator::IsEmpty), "is_empty");
        assert_eq!(format!("{}", Operator::IsNotEmpty), "is_not_empty");
        assert_eq!(format!("{}", Operator::IsAnyOf), "is_any_of");
        assert_eq!(format!("{}", Operator::IsNotAnyOf), "is_not_any_of");
        assert_eq!(format!("{}", Operator::IsEveryOf), "is_every_of");
        assert_eq!(format!("{}", Operator::Before), "before");
        assert_eq!(format!("{}", Operator::BeforeOrEqual), "before_or_equal");
        assert_eq!(format!("{}", Operator::After), "after");
        assert_eq!(format!("{}", Operator::AfterOrEqual), "after_or_equal");
    }

    #[test]
    fn test_parse_round_trip() {
        let names = [
            "equals",
            "not_equals",
            "contains",
            "does_not_contain",
            "is_empty",
            "is_not_empty",
            "is_any_of",
            "is_not_any_of",
            "is_every_of",
            "before",
            "before_or_equal",
            "after",
            "after_or_equal",
        ];
        for name in names {
            let op = Operator::parse(name);
            assert!(!matches!(op, Operator::Unknown(_)), "{name} parsed as unknown");
            assert_eq!(op.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_operator_keeps_raw_text() {
        let op = Operator::parse("matches_regex");
        assert_eq!(op, Operator::Unknown("matches_regex".to_string()));
        assert_eq!(op.as_str(), "matches_regex");
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Operator::IsAnyOf).unwrap();
        assert_eq!(json, "\"is_any_of\"");

        let op: Operator = serde_json::from_str("\"before_or_equal\"").unwrap();
        assert_eq!(op, Operator::BeforeOrEqual);

        // Unrecognized strings deserialize instead of erroring.
        let op: Operator = serde_json::from_str("\"matches_regex\"").unwrap();
        assert_eq!(op, Operator::Unknown("matches_regex".to_string()));
        assert_eq!(serde_json::to_string(&op).unwrap(), "\"matches_regex\"");
    }

    #[test]
    fn test_operator_classes() {
        assert!(Operator::IsEmpty.checks_emptiness());
        assert!(Operator::IsNotEmpty.checks_emptiness());
        assert!(!Operator::Equals.checks_emptiness());

        assert!(Operator::IsAnyOf.takes_list());
        assert!(Operator::IsEveryOf.takes_list());
        assert!(!Operator::Contains.takes_list());

        assert!(Operator::Before.compares_dates());
        assert!(Operator::AfterOrEqual.compares_dates());
        assert!(!Operator::IsAnyOf.compares_dates());
    }
}
