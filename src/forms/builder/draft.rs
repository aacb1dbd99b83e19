// SPDX-License-Identifier: MIT

//! Draft state for the form builder
//!
//! A draft is the editable counterpart of a [`FormDefinition`]. Entities that
//! exist in a published definition keep their stored ids; entities created
//! during the editing session carry pending ids until the draft is frozen,
//! at which point real ids are minted. Commands never mutate a draft in
//! place; applying one produces a new snapshot.

use std::collections::HashMap;

use uuid::Uuid;

use crate::forms::condition::{Condition, ConditionAction, ConditionValue, Operator};
use crate::forms::schema::{
    ChoiceOption, FieldDefinition, FieldKind, FormDefinition, FormSettings,
};

/// Identity of a field or condition while it is being edited
///
/// `Saved` ids come from a published definition. `Pending` ids are handed
/// out by the draft for entities that do not exist in storage yet; they are
/// replaced by real ids on freeze and never leak into a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Id of an entity that exists in a published definition
    Saved(String),
    /// Session-local id of an entity created in this draft
    Pending(u64),
}

impl EntityId {
    /// Wrap a stored id
    pub fn saved(id: impl Into<String>) -> Self {
        EntityId::Saved(id.into())
    }

    /// Whether this entity only exists in the draft
    pub fn is_pending(&self) -> bool {
        matches!(self, EntityId::Pending(_))
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Saved(id) => write!(f, "{}", id),
            EntityId::Pending(n) => write!(f, "pending-{}", n),
        }
    }
}

/// A field as it looks while being edited
///
/// Drafts have no position attribute: the order of the draft's field list is
/// the render order, and numeric positions are derived on freeze.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftField {
    pub id: EntityId,
    pub kind: FieldKind,
    pub label: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Vec<ChoiceOption>,
}

impl DraftField {
    /// A bare field of the given kind, the way the builder first creates it
    pub fn new(id: EntityId, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            description: None,
            placeholder: None,
            required: false,
            options: vec![],
        }
    }
}

/// A visibility rule as it looks while being edited
#[derive(Debug, Clone, PartialEq)]
pub struct DraftCondition {
    pub id: EntityId,
    pub target_field: EntityId,
    pub source_field: EntityId,
    pub operator: Operator,
    pub value: Option<ConditionValue>,
    pub action: ConditionAction,
}

/// An editing snapshot of a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    form_id: String,
    title: String,
    description: Option<String>,
    settings: FormSettings,
    fields: Vec<DraftField>,
    conditions: Vec<DraftCondition>,
    next_pending: u64,
}

impl FormDraft {
    /// Start a draft for a brand new form
    pub fn new(form_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            title: title.into(),
            description: None,
            settings: FormSettings::default(),
            fields: vec![],
            conditions: vec![],
            next_pending: 0,
        }
    }

    /// Open a published definition for editing. Fields come in render
    /// order and keep their stored ids; conditions get pending ids for the
    /// editing session since definitions do not carry condition ids.
    pub fn from_definition(def: &FormDefinition) -> Self {
        let mut ordered: Vec<&FieldDefinition> = def.fields.iter().collect();
        ordered.sort_by_key(|f| f.position);

        let fields = ordered
            .into_iter()
            .map(|f| DraftField {
                id: EntityId::saved(&f.id),
                kind: f.kind,
                label: f.label.clone(),
                description: f.description.clone(),
                placeholder: f.placeholder.clone(),
                required: f.required,
                options: f.options.clone(),
            })
            .collect();

        let mut draft = Self {
            form_id: def.id.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            settings: def.settings.clone(),
            fields,
            conditions: vec![],
            next_pending: 0,
        };

        for condition in &def.conditions {
            let id = draft.mint_pending();
            draft.conditions.push(DraftCondition {
                id,
                target_field: EntityId::saved(&condition.target_field_id),
                source_field: EntityId::saved(&condition.source_field_id),
                operator: condition.operator.clone(),
                value: condition.value.clone(),
                action: condition.action,
            });
        }

        draft
    }

    /// Id of the form being edited
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Title of the form being edited
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fields in render order
    pub fn fields(&self) -> &[DraftField] {
        &self.fields
    }

    /// Conditions in creation order
    pub fn conditions(&self) -> &[DraftCondition] {
        &self.conditions
    }

    /// Look up a field by id
    pub fn field(&self, id: &EntityId) -> Option<&DraftField> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Render position of a field
    pub fn field_index(&self, id: &EntityId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    /// Look up a condition by id
    pub fn condition(&self, id: &EntityId) -> Option<&DraftCondition> {
        self.conditions.iter().find(|c| &c.id == id)
    }

    pub(super) fn condition_index(&self, id: &EntityId) -> Option<usize> {
        self.conditions.iter().position(|c| &c.id == id)
    }

    pub(super) fn mint_pending(&mut self) -> EntityId {
        let id = EntityId::Pending(self.next_pending);
        self.next_pending += 1;
        id
    }

    pub(super) fn fields_mut(&mut self) -> &mut Vec<DraftField> {
        &mut self.fields
    }

    pub(super) fn conditions_mut(&mut self) -> &mut Vec<DraftCondition> {
        &mut self.conditions
    }

    /// Turn the draft into a publishable definition. Pending entities get
    /// freshly minted ids; field positions are derived from draft order.
    pub fn freeze(&self) -> FormDefinition {
        let mut minted: HashMap<EntityId, String> = HashMap::new();
        for field in &self.fields {
            let stored = match &field.id {
                EntityId::Saved(id) => id.clone(),
                EntityId::Pending(_) => Uuid::new_v4().to_string(),
            };
            minted.insert(field.id.clone(), stored);
        }

        let resolve = |id: &EntityId| {
            minted
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string())
        };

        FormDefinition {
            id: self.form_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            fields: self
                .fields
                .iter()
                .enumerate()
                .map(|(index, field)| FieldDefinition {
                    id: resolve(&field.id),
                    kind: field.kind,
                    label: field.label.clone(),
                    description: field.description.clone(),
                    placeholder: field.placeholder.clone(),
                    required: field.required,
                    options: field.options.clone(),
                    position: index as u32,
                })
                .collect(),
            conditions: self
                .conditions
                .iter()
                .map(|condition| Condition {
                    target_field_id: resolve(&condition.target_field),
                    source_field_id: resolve(&condition.source_field),
                    operator: condition.operator.clone(),
                    value: condition.value.clone(),
                    action: condition.action,
                })
                .collect(),
            settings: self.settings.clone(),
        }
    }
}
