// SPDX-License-Identifier: MIT

//! Conditional logic and answer recall evaluation for form definitions.
//!
//! `form` holds the typed document model and loading; `engine` holds the
//! evaluation pipeline that turns a field list plus a response map into a
//! simulation result and a validation report.

pub mod engine;
pub mod form;
