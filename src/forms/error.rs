// SPDX-License-Identifier: MIT

//! Typed error handling for formwork-rs
//!
//! This module provides the error type hierarchy using thiserror. Schema
//! problems are reported as collections of [`SchemaViolation`] so callers can
//! surface every problem in a definition at once instead of stopping at the
//! first one.

use thiserror::Error;

use crate::forms::builder::EntityId;

/// Top-level error type for formwork-rs
#[derive(Debug, Error)]
pub enum FormError {
    /// Form not present in the registry or source
    #[error("Form '{0}' is not registered")]
    UnknownForm(String),

    /// File not found when loading a definition
    #[error("Form definition file not found: {0}")]
    FileNotFound(String),

    /// Definition file with an extension the loader does not handle
    #[error("Unsupported definition format: {0}")]
    UnsupportedFormat(String),

    /// An answer payload that does not fit any answer shape
    #[error("Invalid answer for field '{field}': {reason}")]
    InvalidAnswer { field: String, reason: String },

    /// A definition that failed structural validation
    #[error("Definition failed validation with {} violation(s)", .0.len())]
    Validation(Vec<SchemaViolation>),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// A single structural problem found in a form definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// Field with an empty id
    #[error("Field at position {position} has an empty id")]
    EmptyFieldId { position: u32 },

    /// Two fields sharing an id
    #[error("Duplicate field id '{id}'")]
    DuplicateFieldId { id: String },

    /// Two fields sharing a position
    #[error("Fields '{first}' and '{second}' both claim position {position}")]
    PositionTie {
        first: String,
        second: String,
        position: u32,
    },

    /// Choice field without options
    #[error("Choice field '{id}' declares no options")]
    MissingOptions { id: String },

    /// Options on a field kind that cannot use them
    #[error("Field '{id}' is not a choice field but declares options")]
    UnexpectedOptions { id: String },

    /// Condition targeting a field that does not exist
    #[error("Condition {index} targets unknown field '{id}'")]
    UnknownTarget { index: usize, id: String },

    /// Condition reading a field that does not exist
    #[error("Condition {index} reads unknown field '{id}'")]
    UnknownSource { index: usize, id: String },

    /// Condition whose source does not come strictly before its target
    #[error("Condition {index}: source '{source}' must come before target '{target}'")]
    SourceNotBeforeTarget {
        index: usize,
        // Raw spelling keeps thiserror from treating this data field as the
        // error's source() (it is a field id, not an error cause).
        r#source: String,
        target: String,
    },

    /// Condition reading a field that never holds an answer
    #[error("Condition {index}: divider '{id}' cannot drive visibility")]
    DividerSource { index: usize, id: String },

    /// Comparison value on an operator that ignores it
    #[error("Condition {index}: operator '{operator}' takes no comparison value")]
    ValueNotAllowed { index: usize, operator: String },

    /// Missing comparison value on an operator that requires one
    #[error("Condition {index}: operator '{operator}' needs a comparison value")]
    MissingValue { index: usize, operator: String },

    /// Single value where a set operator expects a list
    #[error("Condition {index}: operator '{operator}' needs a list of values")]
    ListValueExpected { index: usize, operator: String },

    /// List value where an operator expects a single value
    #[error("Condition {index}: operator '{operator}' takes a single value")]
    SingleValueExpected { index: usize, operator: String },

    /// Operator string the evaluator does not recognize
    #[error("Condition {index}: unknown operator '{operator}'")]
    UnknownOperator { index: usize, operator: String },

    /// Redirect URL in settings that does not parse
    #[error("Settings: redirect url '{url}' is invalid: {reason}")]
    InvalidRedirectUrl { url: String, reason: String },
}

/// Errors raised while editing a form draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Command referencing a field the draft does not hold
    #[error("Unknown field {0}")]
    UnknownField(EntityId),

    /// Command referencing a condition the draft does not hold
    #[error("Unknown condition {0}")]
    UnknownCondition(EntityId),

    /// Condition reading the field it targets
    #[error("A field cannot drive its own visibility")]
    SelfReference,

    /// Condition whose source would sit at or after its target
    #[error("Source field {source} must come before target {target}")]
    SourceAfterTarget {
        // Raw spelling keeps thiserror from treating this data field as the
        // error's source() (it is an entity id, not an error cause).
        r#source: EntityId,
        target: EntityId,
    },

    /// Insert or move index past the end of the field list
    #[error("Index {0} is out of range")]
    IndexOutOfRange(usize),
}

impl FormError {
    /// Create an unknown form error
    pub fn unknown_form(id: impl Into<String>) -> Self {
        Self::UnknownForm(id.into())
    }

    /// Create an invalid answer error
    pub fn invalid_answer(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAnswer {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat(detail.into())
    }
}
