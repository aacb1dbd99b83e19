//! Structural validation of form definitions
//!
//! Validation collects every problem in a definition rather than stopping at
//! the first, so a builder UI can mark all offending fields and rules in one
//! pass. A definition that validates cleanly is safe to publish; the
//! evaluator itself tolerates broken definitions by failing open.

use std::collections::HashMap;

use super::types::{FieldKind, FormDefinition};
use crate::forms::condition::{Condition, Operator};
use crate::forms::error::SchemaViolation;

/// Validate a form definition, returning every violation found. An empty
/// list means the definition is publishable.
pub fn validate_form(def: &FormDefinition) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    check_fields(def, &mut violations);
    for (index, condition) in def.conditions.iter().enumerate() {
        check_condition(def, index, condition, &mut violations);
    }
    check_settings(def, &mut violations);

    violations
}

fn check_fields(def: &FormDefinition, violations: &mut Vec<SchemaViolation>) {
    let mut seen_ids: HashMap<&str, ()> = HashMap::new();
    let mut claimed_positions: HashMap<u32, &str> = HashMap::new();

    for field in &def.fields {
        if field.id.is_empty() {
            violations.push(SchemaViolation::EmptyFieldId {
                position: field.position,
            });
        } else if seen_ids.insert(&field.id, ()).is_some() {
            violations.push(SchemaViolation::DuplicateFieldId {
                id: field.id.clone(),
            });
        }

        match claimed_positions.get(&field.position) {
            Some(first) => violations.push(SchemaViolation::PositionTie {
                first: first.to_string(),
                second: field.id.clone(),
                position: field.position,
            }),
            None => {
                claimed_positions.insert(field.position, &field.id);
            }
        }

        if field.kind.is_choice() && field.options.is_empty() {
            violations.push(SchemaViolation::MissingOptions {
                id: field.id.clone(),
            });
        }
        if !field.kind.is_choice() && !field.options.is_empty() {
            violations.push(SchemaViolation::UnexpectedOptions {
                id: field.id.clone(),
            });
        }
    }
}

fn check_condition(
    def: &FormDefinition,
    index: usize,
    condition: &Condition,
    violations: &mut Vec<SchemaViolation>,
) {
    let target = def.field(&condition.target_field_id);
    let source = def.field(&condition.source_field_id);

    if target.is_none() {
        violations.push(SchemaViolation::UnknownTarget {
            index,
            id: condition.target_field_id.clone(),
        });
    }
    if source.is_none() {
        violations.push(SchemaViolation::UnknownSource {
            index,
            id: condition.source_field_id.clone(),
        });
    }

    if let (Some(target), Some(source)) = (target, source) {
        // Self-targeting rules fall out of the position check.
        if source.position >= target.position {
            violations.push(SchemaViolation::SourceNotBeforeTarget {
                index,
                source: source.id.clone(),
                target: target.id.clone(),
            });
        }
        if source.kind == FieldKind::Divider {
            violations.push(SchemaViolation::DividerSource {
                index,
                id: source.id.clone(),
            });
        }
    }

    check_operator_payload(index, condition, violations);
}

fn check_operator_payload(
    index: usize,
    condition: &Condition,
    violations: &mut Vec<SchemaViolation>,
) {
    let operator = &condition.operator;
    let name = operator.as_str().to_string();

    if let Operator::Unknown(_) = operator {
        violations.push(SchemaViolation::UnknownOperator {
            index,
            operator: name,
        });
        return;
    }

    if operator.checks_emptiness() {
        if condition.value.is_some() {
            violations.push(SchemaViolation::ValueNotAllowed {
                index,
                operator: name,
            });
        }
        return;
    }

    let Some(value) = condition.value.as_ref() else {
        violations.push(SchemaViolation::MissingValue {
            index,
            operator: name,
        });
        return;
    };

    if operator.takes_list() {
        if value.as_many().is_none() {
            violations.push(SchemaViolation::ListValueExpected {
                index,
                operator: name,
            });
        }
    } else if value.as_one().is_none() {
        violations.push(SchemaViolation::SingleValueExpected {
            index,
            operator: name,
        });
    }
}

fn check_settings(def: &FormDefinition, violations: &mut Vec<SchemaViolation>) {
    if let Some(raw) = def.settings.redirect_url.as_deref() {
        if let Err(err) = url::Url::parse(raw) {
            violations.push(SchemaViolation::InvalidRedirectUrl {
                url: raw.to_string(),
                reason: err.to_string(),
            });
        }
    }
}
