// SPDX-License-Identifier: MIT

//! Conditional visibility for form fields
//!
//! This module provides evaluation of the visibility rules a form builder
//! wires between fields. Rules read answers and show or hide fields:
//! - show `diet` when `attending` equals `"yes"`
//! - hide `intro_pack` when `member` is_any_of `["regular", "staff"]`
//! - show `followup` when `topics` contains `"volunteering"`

mod evaluator;
mod operator;
mod rule;
mod visibility;

pub use evaluator::evaluate_condition;
pub(crate) use evaluator::parse_calendar_date;
pub use operator::Operator;
pub use rule::{Condition, ConditionAction, ConditionValue};
pub use visibility::{condition_satisfied, hidden_fields, is_field_visible, visible_fields};
