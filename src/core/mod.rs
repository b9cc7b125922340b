//! core
//!
//! Domain types, path handling and configuration.
//!
//! # Modules
//!
//! - [`types`] - Selections, repositories, resolution settings
//! - [`paths`] - Path comparison and URL path encoding
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Types carry no I/O; the Git host fills them in
//! - Path functions take the separator explicitly so they behave the same
//!   on every platform

pub mod config;
pub mod paths;
pub mod types;
