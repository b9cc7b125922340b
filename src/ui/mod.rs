//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Result, warning and error display
//!
//! # Design
//!
//! All terminal output goes through this module so text and JSON modes stay
//! consistent and error messages are redacted in one place.

pub mod output;
