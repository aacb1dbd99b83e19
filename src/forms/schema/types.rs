// SPDX-License-Identifier: MIT

//! Form definition types
//!
//! These types describe the published shape of a form: its fields in render
//! order, the visibility conditions wired between them, and presentation
//! settings. Definitions are plain data and carry no runtime state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::forms::condition::{visible_fields, Condition};
use crate::forms::response::ResponseSet;

/// A published form definition
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct FormDefinition {
    /// Stable identifier, also the file stem for file-backed forms
    pub id: String,
    /// Title shown above the form
    pub title: String,
    /// Optional introduction text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in render order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Visibility rules between fields
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Presentation settings
    #[serde(default)]
    pub settings: FormSettings,
}

/// A single field of a form
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FieldDefinition {
    /// Identifier, unique within the form
    pub id: String,
    /// What kind of input this field renders
    pub kind: FieldKind,
    /// Label shown next to the input
    pub label: String,
    /// Optional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional placeholder for text inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether a visible field must be answered before submission
    #[serde(default)]
    pub required: bool,
    /// Choices for single_choice / multi_choice fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    /// Render position; fields are sorted by this on load
    pub position: u32,
}

/// The input kinds a field can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line text input
    ShortText,
    /// Multi-line text input
    LongText,
    /// Numeric input, stored as the text entered
    Number,
    /// Email address input
    Email,
    /// Calendar date input, stored as YYYY-MM-DD
    Date,
    /// Radio buttons or dropdown over options
    SingleChoice,
    /// Checkbox group over options
    MultiChoice,
    /// Single yes/no checkbox
    Checkbox,
    /// Visual separator; holds no answer
    Divider,
}

impl FieldKind {
    /// Whether this kind selects from a declared option list
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::SingleChoice | FieldKind::MultiChoice)
    }

    /// Whether this kind collects an answer at all
    pub fn takes_answer(&self) -> bool {
        !matches!(self, FieldKind::Divider)
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ChoiceOption {
    /// Stored answer value
    pub value: String,
    /// Text shown to the respondent
    pub label: String,
}

impl ChoiceOption {
    /// Build an option whose label doubles as its stored value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Presentation settings of a form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct FormSettings {
    /// Label of the submit button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    /// Message shown after a successful submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    /// URL to redirect to after submission, instead of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl FormDefinition {
    /// Look up a field by id
    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Conditions attached to a given target field
    pub fn conditions_for<'a>(
        &'a self,
        field_id: &'a str,
    ) -> impl Iterator<Item = &'a Condition> + 'a {
        self.conditions
            .iter()
            .filter(move |c| c.target_field_id == field_id)
    }

    /// Sort fields into render order. Loaders call this after parsing so
    /// the rest of the engine can rely on slice order.
    pub fn normalize(&mut self) {
        self.fields.sort_by_key(|f| f.position);
    }

    /// The fields currently visible for a set of answers, in render order
    pub fn visible_fields(&self, values: &ResponseSet) -> Vec<&FieldDefinition> {
        visible_fields(&self.fields, &self.conditions, values)
    }
}
