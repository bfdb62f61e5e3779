// SPDX-License-Identifier: MIT

//! Evaluation pipeline for field logic and answer recall
//!
//! - `index` - field lookup by id and display position
//! - `condition` - single comparisons and the shorthand expression parser
//! - `logic` - AND/OR aggregation, actions, skip targets
//! - `recall` - direct and template recall with named functions
//! - `dependencies` - which fields a field reads
//! - `validate` - static checks producing a `ValidationReport`
//! - `driver` - the single ordered pass producing a `SimulationResult`

pub mod condition;
pub mod dependencies;
pub mod driver;
pub mod index;
pub mod logic;
pub mod recall;
pub mod report;
pub mod validate;

pub use dependencies::field_dependencies;
pub use driver::{evaluate_form, Evaluator, SimulationResult};
pub use index::FieldIndex;
pub use logic::{evaluate_visibility, Visibility};
pub use report::{Issue, IssueKind, Severity, ValidationReport};
pub use validate::validate_form;
