// SPDX-License-Identifier: MIT

//! Builder commands and the reducer that applies them
//!
//! Every edit in the builder is a [`DraftCommand`] applied to a snapshot,
//! yielding a new snapshot or a typed error. The input draft is never
//! touched, which makes undo a matter of keeping old snapshots around.
//!
//! Two invariants hold in every draft that leaves [`apply`]:
//! - a condition's source field sits strictly before its target field
//! - every condition endpoint refers to a field present in the draft
//!
//! Removing a field drops the conditions wired to it. Moving a field drops
//! any condition whose ordering the move breaks.

use std::collections::HashMap;

use super::draft::{DraftCondition, DraftField, EntityId, FormDraft};
use crate::forms::condition::{ConditionAction, ConditionValue, Operator};
use crate::forms::error::DraftError;
use crate::forms::schema::{ChoiceOption, FieldKind};

/// An edit to a form draft
#[derive(Debug, Clone)]
pub enum DraftCommand {
    /// Insert a bare field, at `at` or appended when absent
    AddField {
        kind: FieldKind,
        label: String,
        at: Option<usize>,
    },
    /// Patch attributes of a field
    UpdateField { field: EntityId, patch: FieldPatch },
    /// Remove a field and every condition wired to it
    RemoveField { field: EntityId },
    /// Move a field to a new render position
    MoveField { field: EntityId, to: usize },
    /// Wire a new condition between two existing fields
    AddCondition {
        target: EntityId,
        source: EntityId,
        operator: Operator,
        value: Option<ConditionValue>,
        action: ConditionAction,
    },
    /// Patch an existing condition
    UpdateCondition {
        condition: EntityId,
        patch: ConditionPatch,
    },
    /// Remove a condition
    RemoveCondition { condition: EntityId },
}

/// Partial update of a field; absent attributes stay as they are
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<ChoiceOption>>,
}

/// Partial update of a condition; absent attributes stay as they are
///
/// `value` is doubly optional: `Some(None)` clears the payload, which is
/// what switching to an emptiness operator needs.
#[derive(Debug, Clone, Default)]
pub struct ConditionPatch {
    pub source: Option<EntityId>,
    pub operator: Option<Operator>,
    pub value: Option<Option<ConditionValue>>,
    pub action: Option<ConditionAction>,
}

/// Apply a command to a draft, producing the next draft
pub fn apply(draft: &FormDraft, command: DraftCommand) -> Result<FormDraft, DraftError> {
    let mut next = draft.clone();

    match command {
        DraftCommand::AddField { kind, label, at } => {
            let index = at.unwrap_or(next.fields().len());
            if index > next.fields().len() {
                return Err(DraftError::IndexOutOfRange(index));
            }
            let id = next.mint_pending();
            next.fields_mut()
                .insert(index, DraftField::new(id, kind, label));
        }

        DraftCommand::UpdateField { field, patch } => {
            let index = next
                .field_index(&field)
                .ok_or(DraftError::UnknownField(field))?;
            let entry = &mut next.fields_mut()[index];
            if let Some(label) = patch.label {
                entry.label = label;
            }
            if let Some(description) = patch.description {
                entry.description = Some(description);
            }
            if let Some(placeholder) = patch.placeholder {
                entry.placeholder = Some(placeholder);
            }
            if let Some(required) = patch.required {
                entry.required = required;
            }
            if let Some(options) = patch.options {
                entry.options = options;
            }
        }

        DraftCommand::RemoveField { field } => {
            let index = next
                .field_index(&field)
                .ok_or_else(|| DraftError::UnknownField(field.clone()))?;
            next.fields_mut().remove(index);
            next.conditions_mut()
                .retain(|c| c.target_field != field && c.source_field != field);
        }

        DraftCommand::MoveField { field, to } => {
            let from = next
                .field_index(&field)
                .ok_or(DraftError::UnknownField(field))?;
            if to >= next.fields().len() {
                return Err(DraftError::IndexOutOfRange(to));
            }
            let moved = next.fields_mut().remove(from);
            next.fields_mut().insert(to, moved);
            prune_unorderable_conditions(&mut next);
        }

        DraftCommand::AddCondition {
            target,
            source,
            operator,
            value,
            action,
        } => {
            check_endpoints(&next, &source, &target)?;
            let id = next.mint_pending();
            next.conditions_mut().push(DraftCondition {
                id,
                target_field: target,
                source_field: source,
                operator,
                value,
                action,
            });
        }

        DraftCommand::UpdateCondition { condition, patch } => {
            let index = next
                .condition_index(&condition)
                .ok_or(DraftError::UnknownCondition(condition))?;
            let target = next.conditions()[index].target_field.clone();
            let source = patch
                .source
                .unwrap_or_else(|| next.conditions()[index].source_field.clone());
            check_endpoints(&next, &source, &target)?;

            let entry = &mut next.conditions_mut()[index];
            entry.source_field = source;
            if let Some(operator) = patch.operator {
                entry.operator = operator;
            }
            if let Some(value) = patch.value {
                entry.value = value;
            }
            if let Some(action) = patch.action {
                entry.action = action;
            }
        }

        DraftCommand::RemoveCondition { condition } => {
            let index = next
                .condition_index(&condition)
                .ok_or(DraftError::UnknownCondition(condition))?;
            next.conditions_mut().remove(index);
        }
    }

    Ok(next)
}

fn check_endpoints(
    draft: &FormDraft,
    source: &EntityId,
    target: &EntityId,
) -> Result<(), DraftError> {
    let source_index = draft
        .field_index(source)
        .ok_or_else(|| DraftError::UnknownField(source.clone()))?;
    let target_index = draft
        .field_index(target)
        .ok_or_else(|| DraftError::UnknownField(target.clone()))?;
    if source == target {
        return Err(DraftError::SelfReference);
    }
    if source_index >= target_index {
        return Err(DraftError::SourceAfterTarget {
            source: source.clone(),
            target: target.clone(),
        });
    }
    Ok(())
}

fn prune_unorderable_conditions(draft: &mut FormDraft) {
    let order: HashMap<EntityId, usize> = draft
        .fields()
        .iter()
        .enumerate()
        .map(|(index, field)| (field.id.clone(), index))
        .collect();
    draft.conditions_mut().retain(|condition| {
        match (
            order.get(&condition.source_field),
            order.get(&condition.target_field),
        ) {
            (Some(source), Some(target)) => source < target,
            _ => false,
        }
    });
}
