// SPDX-License-Identifier: MIT

//! In-progress answer storage for a form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::forms::error::FormError;

/// A single answer, shaped by the field that produced it
///
/// Text inputs and choices produce [`Text`], checkboxes produce [`Flag`],
/// multi-selections produce [`Many`]. Number and date fields hold their
/// answers as text, exactly as entered.
///
/// [`Text`]: AnswerValue::Text
/// [`Flag`]: AnswerValue::Flag
/// [`Many`]: AnswerValue::Many
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free text or a single selected option value
    Text(String),
    /// Checkbox state
    Flag(bool),
    /// Selected option values of a multi-choice field
    Many(Vec<String>),
}

impl AnswerValue {
    /// Build a text answer
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    /// Build a checkbox answer
    pub fn flag(value: bool) -> Self {
        AnswerValue::Flag(value)
    }

    /// Build a multi-selection answer
    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// Whether this answer counts as empty: blank text, an unchecked box,
    /// or a selection with nothing in it.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.is_empty(),
            AnswerValue::Flag(b) => !b,
            AnswerValue::Many(items) => items.is_empty(),
        }
    }

    /// The text content, if this is a text answer
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The checkbox state, if this is a checkbox answer
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AnswerValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// The selections, if this is a multi-selection answer
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Many(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a raw JSON value into an answer. Numbers are kept as the
    /// text the respondent typed; null is not an answer and must be
    /// handled by the caller as a removal.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(AnswerValue::Text(s.clone())),
            Value::Bool(b) => Ok(AnswerValue::Flag(*b)),
            Value::Number(n) => Ok(AnswerValue::Text(n.to_string())),
            Value::Array(items) => {
                let mut selections = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(s) => selections.push(s.to_string()),
                        None => return Err("selection lists may only contain strings".to_string()),
                    }
                }
                Ok(AnswerValue::Many(selections))
            }
            Value::Null => Err("null is not an answer".to_string()),
            Value::Object(_) => Err("objects are not valid answers".to_string()),
        }
    }

    /// JSON representation of the answer
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::Text(s) => Value::String(s.clone()),
            AnswerValue::Flag(b) => Value::Bool(*b),
            AnswerValue::Many(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
            }
        }
    }
}

/// The answers a respondent has given so far, keyed by field id
///
/// Fields the respondent has not touched are simply absent. The visibility
/// engine reads this map and nothing else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSet {
    answers: HashMap<String, AnswerValue>,
}

impl ResponseSet {
    /// Create an empty response set
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    /// Record an answer, replacing any previous one for the field
    pub fn set(&mut self, field_id: impl Into<String>, value: AnswerValue) {
        self.answers.insert(field_id.into(), value);
    }

    /// Remove an answer, returning it if one was present
    pub fn clear(&mut self, field_id: &str) -> Option<AnswerValue> {
        self.answers.remove(field_id)
    }

    /// The answer for a field, if any
    pub fn answer(&self, field_id: &str) -> Option<&AnswerValue> {
        self.answers.get(field_id)
    }

    /// Whether a field holds a non-empty answer
    pub fn is_answered(&self, field_id: &str) -> bool {
        self.answers
            .get(field_id)
            .is_some_and(|value| !value.is_empty())
    }

    /// Text answer accessor
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.answers.get(field_id).and_then(AnswerValue::as_text)
    }

    /// Checkbox accessor; an absent answer reads as unchecked
    pub fn checked(&self, field_id: &str) -> bool {
        self.answers
            .get(field_id)
            .and_then(AnswerValue::as_flag)
            .unwrap_or(false)
    }

    /// Multi-selection accessor
    pub fn selections(&self, field_id: &str) -> Option<&[String]> {
        self.answers.get(field_id).and_then(AnswerValue::as_many)
    }

    /// Number of answered fields
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Whether no field has been answered
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Ids of all answered fields
    pub fn field_ids(&self) -> impl Iterator<Item = &String> {
        self.answers.keys()
    }

    /// Build a response set from a JSON object of `field id -> answer`.
    /// Null entries are treated as unanswered and skipped.
    pub fn from_json(value: &Value) -> Result<Self, FormError> {
        let object = value.as_object().ok_or_else(|| {
            FormError::invalid_answer("<root>", "answers must be a JSON object")
        })?;

        let mut set = Self::new();
        for (field_id, raw) in object {
            if raw.is_null() {
                continue;
            }
            let answer = AnswerValue::from_json(raw)
                .map_err(|reason| FormError::invalid_answer(field_id, reason))?;
            set.answers.insert(field_id.clone(), answer);
        }
        Ok(set)
    }

    /// Apply a partial update: null entries clear answers, everything else
    /// replaces them.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) -> Result<(), FormError> {
        for (field_id, raw) in patch {
            if raw.is_null() {
                self.answers.remove(field_id);
                continue;
            }
            let answer = AnswerValue::from_json(raw)
                .map_err(|reason| FormError::invalid_answer(field_id, reason))?;
            self.answers.insert(field_id.clone(), answer);
        }
        Ok(())
    }

    /// Convert the response set to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.answers
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
