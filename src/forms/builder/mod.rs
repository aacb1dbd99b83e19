// SPDX-License-Identifier: MIT

//! Form builder state machine
//!
//! This module provides:
//! - `FormDraft` - an immutable editing snapshot of a form
//! - `DraftCommand` / `apply` - the edits and the reducer that applies them
//! - `EntityId` - saved-or-pending identity for fields and conditions

mod command;
mod draft;

pub use command::{apply, ConditionPatch, DraftCommand, FieldPatch};
pub use draft::{DraftCondition, DraftField, EntityId, FormDraft};
