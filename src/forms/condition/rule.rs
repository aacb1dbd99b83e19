// SPDX-License-Identifier: MIT

//! Visibility rule definitions
//!
//! A [`Condition`] links two fields of a form: it reads the answer of its
//! source field and shows or hides its target field based on an operator
//! comparison. All conditions targeting the same field are ANDed together.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::operator::Operator;

/// A single visibility rule attached to a form
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Condition {
    /// Field whose visibility this rule controls
    pub target_field_id: String,
    /// Field whose answer this rule reads
    pub source_field_id: String,
    /// How the source answer is compared
    pub operator: Operator,
    /// Comparison payload; absent for the emptiness operators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
    /// Whether a satisfied comparison shows or hides the target
    #[serde(default)]
    pub action: ConditionAction,
}

/// What happens to the target field when the comparison holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConditionAction {
    /// Target is visible while the comparison holds (default)
    #[default]
    Show,
    /// Target is hidden while the comparison holds
    Hide,
}

/// Comparison payload for a condition
///
/// Scalar operators carry a single string, set operators carry a list. Older
/// definitions encoded lists as JSON text inside a string; [`from_legacy`]
/// upgrades those in one place so the evaluator never parses JSON.
///
/// [`from_legacy`]: ConditionValue::from_legacy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    /// Single comparison value
    One(String),
    /// List of comparison values for the set operators
    Many(Vec<String>),
}

impl ConditionValue {
    /// Build a single-value payload
    pub fn one(value: impl Into<String>) -> Self {
        ConditionValue::One(value.into())
    }

    /// Build a list payload
    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConditionValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// Upgrade a payload from the legacy string encoding, where list values
    /// arrived as JSON array text inside a plain string.
    pub fn from_legacy(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim_start().starts_with('[') {
            let items: Vec<String> = serde_json::from_str(raw)?;
            Ok(ConditionValue::Many(items))
        } else {
            Ok(ConditionValue::One(raw.to_string()))
        }
    }

    /// The single value, if this payload holds exactly one
    pub fn as_one(&self) -> Option<&str> {
        match self {
            ConditionValue::One(value) => Some(value),
            ConditionValue::Many(_) => None,
        }
    }

    /// The list payload, if this is one
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            ConditionValue::One(_) => None,
            ConditionValue::Many(values) => Some(values),
        }
    }

    /// View the payload as a slice. A single value reads as a one-element
    /// list, which is how the set operators treat it.
    pub fn as_slice(&self) -> &[String] {
        match self {
            ConditionValue::One(value) => std::slice::from_ref(value),
            ConditionValue::Many(values) => values,
        }
    }
}

impl Condition {
    /// Build a rule that shows `target` when the comparison holds
    pub fn show(
        target: impl Into<String>,
        source: impl Into<String>,
        operator: Operator,
        value: Option<ConditionValue>,
    ) -> Self {
        Self {
            target_field_id: target.into(),
            source_field_id: source.into(),
            operator,
            value,
            action: ConditionAction::Show,
        }
    }

    /// Build a rule that hides `target` when the comparison holds
    pub fn hide(
        target: impl Into<String>,
        source: impl Into<String>,
        operator: Operator,
        value: Option<ConditionValue>,
    ) -> Self {
        Self {
            target_field_id: target.into(),
            source_field_id: source.into(),
            operator,
            value,
            action: ConditionAction::Hide,
        }
    }
}
