// SPDX-License-Identifier: MIT

pub mod builder;
pub mod condition;
pub mod error;
pub mod loader;
pub mod registry;
pub mod response;
pub mod schema;
pub mod source;
pub mod submission;
