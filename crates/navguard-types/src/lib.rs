//! Stable DTOs and IDs used across the navguard workspace.
//!
//! This crate is intentionally boring:
//! - the decision value every evaluator returns
//! - the closed policy enums (HTTPS strategy, scheme class)
//! - stable string IDs for decision codes
//! - explain registry for operator-facing guidance

#![forbid(unsafe_code)]

pub mod decision;
pub mod explain;
pub mod ids;
pub mod policy;

pub use decision::{Reason, ValidationResult};
pub use explain::{Explanation, lookup_explanation};
pub use policy::{HttpsStrategy, SchemeClass};
