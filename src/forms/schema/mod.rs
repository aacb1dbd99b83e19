// SPDX-License-Identifier: MIT

//! Form definition schema
//!
//! This module provides:
//! - `FormDefinition` - the published shape of a form
//! - `FieldDefinition` / `FieldKind` - the fields a form renders
//! - `validate_form` - structural validation before publishing

mod types;
mod validate;

pub use types::{ChoiceOption, FieldDefinition, FieldKind, FormDefinition, FormSettings};
pub use validate::validate_form;
