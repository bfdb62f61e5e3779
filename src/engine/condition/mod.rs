// SPDX-License-Identifier: MIT

//! Condition evaluation for field logic
//!
//! This module provides evaluation of single conditions against response
//! values and parsing of the shorthand expression language used by
//! `show_when` / `hide_when` / `require_when`:
//! - `plan == 'pro'`
//! - `age > 18`
//! - `country == 'US' and age < 21`
//! - `notes is not empty`

mod evaluator;
mod parser;

pub use evaluator::evaluate_condition;
pub use parser::parse;
