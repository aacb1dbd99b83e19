// SPDX-License-Identifier: MIT

//! Conditional-visibility engine for dynamic forms.
//!
//! Form definitions declare fields plus show/hide conditions over other
//! fields' answers. This crate evaluates those conditions, filters fields
//! down to the visible set, checks submissions against it, and carries the
//! draft/command model the form builder edits through. A small axum server
//! exposes the same engine for live previews.

pub mod forms;
pub mod server;
