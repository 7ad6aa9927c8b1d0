//! Validation and filtering of request bodies
//!
//! Request types declare their rules through [`ValidatedPayload`]; handlers
//! receive them through the [`Validated`] extractor already trimmed and
//! checked.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::PayloadRules;
pub use extractor::{Validated, ValidatedPayload};
