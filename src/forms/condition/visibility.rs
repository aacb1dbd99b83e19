//! Field visibility resolution
//!
//! A field is visible when every condition targeting it is satisfied, where a
//! `show` rule is satisfied by a holding comparison and a `hide` rule by a
//! failing one. Fields nothing targets are always visible.
//!
//! Conditions read answers directly from the response set. Whether the source
//! field is itself visible does not enter into it: hiding a source field does
//! not blank its answer, and its dependents keep following that answer until
//! it changes.

use super::evaluator::evaluate_condition;
use super::rule::{Condition, ConditionAction};
use crate::forms::response::ResponseSet;
use crate::forms::schema::FieldDefinition;

/// Whether a single condition is satisfied, with its action applied
pub fn condition_satisfied(condition: &Condition, values: &ResponseSet) -> bool {
    let holds = evaluate_condition(condition, values);
    match condition.action {
        ConditionAction::Show => holds,
        ConditionAction::Hide => !holds,
    }
}

/// Whether a field should currently be visible
pub fn is_field_visible(field_id: &str, conditions: &[Condition], values: &ResponseSet) -> bool {
    conditions
        .iter()
        .filter(|c| c.target_field_id == field_id)
        .all(|c| condition_satisfied(c, values))
}

/// Filter fields down to the visible ones, preserving their order
pub fn visible_fields<'a>(
    fields: &'a [FieldDefinition],
    conditions: &[Condition],
    values: &ResponseSet,
) -> Vec<&'a FieldDefinition> {
    fields
        .iter()
        .filter(|field| is_field_visible(&field.id, conditions, values))
        .collect()
}

/// The complement of [`visible_fields`], preserving order
pub fn hidden_fields<'a>(
    fields: &'a [FieldDefinition],
    conditions: &[Condition],
    values: &ResponseSet,
) -> Vec<&'a FieldDefinition> {
    fields
        .iter()
        .filter(|field| !is_field_visible(&field.id, conditions, values))
        .collect()
}
