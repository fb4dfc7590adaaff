//! Core types for provdeps
//!
//! This module holds the error system shared by every other module:
//! - [`ProvdepsError`] - Enumerated error types covering all failure modes
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! # Error Handling Pattern
//!
//! Library code returns [`Result`] with a [`ProvdepsError`]; the CLI works in
//! `anyhow` and converts at the very end.
//!
//! ```rust
//! use provdeps::core::{ProvdepsError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(ProvdepsError::UnsupportedFormat { extension: "xml".into() }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, ProvdepsError, user_friendly_error};

/// Result alias used by the library modules.
pub type Result<T, E = ProvdepsError> = std::result::Result<T, E>;
