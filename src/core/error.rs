//! Error handling for provdeps
//!
//! This module provides the error types and user-friendly error reporting for
//! provdeps. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell bad input data apart from
//!    internal invariant violations
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ProvdepsError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Material extraction**: [`ProvdepsError::ImageReference`] is raised by the image
//!   collaborators and propagated by the resolvers unchanged.
//! - **Internal**: [`ProvdepsError::IdentitySerialization`] signals that a descriptor
//!   could not be turned into a duplicate-identity key. Well-formed descriptors never
//!   produce it.
//! - **Input and configuration**: [`ProvdepsError::InputParseError`],
//!   [`ProvdepsError::UnsupportedFormat`], [`ProvdepsError::ConfigError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use provdeps::core::{ProvdepsError, user_friendly_error};
//!
//! let err = ProvdepsError::ImageReference {
//!     image: "registry.local/app:latest".to_string(),
//!     reason: "missing digest".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for provdeps operations.
///
/// None of these errors are retryable: every input is an in-memory status snapshot,
/// so a failure means the snapshot (or the code) is wrong, not that the world is
/// temporarily unavailable.
#[derive(Error, Debug)]
pub enum ProvdepsError {
    /// A step or sidecar image ID could not be turned into a material.
    ///
    /// Raised by the image collaborators. Resolvers surface it unchanged and
    /// discard everything collected so far.
    #[error("Invalid image reference '{image}': {reason}")]
    ImageReference {
        /// The raw image ID recorded in the execution status
        image: String,
        /// Why the reference was rejected
        reason: String,
    },

    /// A descriptor could not be canonically serialized for duplicate detection.
    #[error("Failed to compute identity of resolved dependency '{uri}': {reason}")]
    IdentitySerialization {
        /// URI of the offending descriptor
        uri: String,
        /// Serializer message
        reason: String,
    },

    /// An input document (status snapshot or descriptor list) could not be parsed.
    #[error("Failed to parse input document {file}: {reason}")]
    InputParseError {
        /// Where the document came from (a path or `<stdin>`)
        file: String,
        /// Parser message
        reason: String,
    },

    /// The input file extension names a format provdeps does not read.
    #[error("Unsupported input format '{extension}'")]
    UnsupportedFormat {
        /// The rejected extension
        extension: String,
    },

    /// Configuration file problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl ProvdepsError {
    /// Whether this error reports an internal invariant violation rather than bad
    /// input data.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::IdentitySerialization { .. })
    }
}

impl Clone for ProvdepsError {
    fn clone(&self) -> Self {
        match self {
            Self::ImageReference {
                image,
                reason,
            } => Self::ImageReference {
                image: image.clone(),
                reason: reason.clone(),
            },
            Self::IdentitySerialization {
                uri,
                reason,
            } => Self::IdentitySerialization {
                uri: uri.clone(),
                reason: reason.clone(),
            },
            Self::InputParseError {
                file,
                reason,
            } => Self::InputParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::UnsupportedFormat {
                extension,
            } => Self::UnsupportedFormat {
                extension: extension.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // Wrapped foreign errors are not Clone, flatten them to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::YamlError(e) => Self::Other {
                message: format!("YAML error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and extra details for the CLI.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: ProvdepsError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ProvdepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for terminal display.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(err) = error.downcast_ref::<ProvdepsError>() {
        let ctx = create_error_context(err.clone());
        // Keep the caller's context (e.g. which file) when the variant has no details
        let outer = error.to_string();
        if ctx.details.is_none() && outer != err.to_string() {
            return ctx.with_details(outer);
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(ProvdepsError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the input file exists and the path is correct");
        }
    }

    // Generic error, keep the whole chain for diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ProvdepsError::Other {
        message,
    })
}

fn create_error_context(error: ProvdepsError) -> ErrorContext {
    match &error {
        ProvdepsError::ImageReference { .. } => ErrorContext::new(error)
            .with_suggestion("Image IDs must be digest-pinned, e.g. 'registry.io/app@sha256:<hex>'")
            .with_details("Step and sidecar image IDs are read from the execution status as recorded by the runtime"),

        ProvdepsError::IdentitySerialization { .. } => ErrorContext::new(error)
            .with_suggestion("This is a bug in provdeps; please report it together with the input snapshot")
            .with_details("Resolved dependencies are compared by their canonical (uri, digest) serialization"),

        ProvdepsError::InputParseError { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the document as JSON or YAML using camelCase field names")
            .with_details("Status snapshots carry a 'status' object; descriptor lists carry 'resolvedDependencies'"),

        ProvdepsError::UnsupportedFormat { .. } => ErrorContext::new(error)
            .with_suggestion("Use a .json, .yaml or .yml file, or '-' to read from stdin"),

        ProvdepsError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.provdeps/config.toml or the file passed with --config"),

        ProvdepsError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax and keys of your provdeps config file"),

        ProvdepsError::JsonError(_) | ProvdepsError::YamlError(_) => ErrorContext::new(error)
            .with_suggestion("The resolved dependencies could not be rendered; try the other --format"),

        ProvdepsError::IoError(_) => ErrorContext::new(error)
            .with_suggestion("Check that stdout is writable (a closed pipe ends output early)"),

        _ => ErrorContext::new(error),
    }
}
