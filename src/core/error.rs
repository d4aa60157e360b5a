//! Error handling for tera-jsx
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`JsxError`]) for anything a caller may want to match on
//! 2. **User-friendly messages** ([`ErrorContext`]) with a suggestion for CLI users
//!
//! # Error Categories
//!
//! - **Template authoring**: [`JsxError::NestedBlock`], [`JsxError::UnclosedBlock`].
//!   These are structural misuses and always fail loudly, before any output is produced
//!   for the offending template.
//! - **Rendering**: [`JsxError::Render`] wraps a failure reported by the Tera engine.
//! - **Configuration**: [`JsxError::Config`].
//! - **File system**: [`JsxError::UnreadableSource`]. Raw [`std::io::Error`]s stay in
//!   the `anyhow` chain and are mapped by [`user_friendly_error`].
//!
//! Missing context references are deliberately *not* errors: the projector degrades
//! to the configured fallback string for that one path (see
//! [`crate::templating::projection`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use tera_jsx::core::{JsxError, user_friendly_error};
//!
//! let error = JsxError::NestedBlock {
//!     template: "pages/home.html".to_string(),
//!     line: 12,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for tera-jsx operations
#[derive(Error, Debug, Clone)]
pub enum JsxError {
    /// A `{% jsx %}` start tag was found inside another block's body.
    ///
    /// Fingerprinting and expression extraction work on a single verbatim body, so
    /// blocks do not compose recursively.
    #[error("jsx blocks cannot be nested in a template ({template}, line {line})")]
    NestedBlock {
        /// Name or path of the template containing the nested block
        template: String,
        /// 1-based line of the nested start tag
        line: usize,
    },

    /// A `{% jsx %}` start tag without a matching `{% endjsx %}`
    #[error("Unclosed jsx block in template {template} starting at line {line}")]
    UnclosedBlock {
        /// Name or path of the template
        template: String,
        /// 1-based line of the unmatched start tag
        line: usize,
    },

    /// The Tera engine rejected or failed to render the template
    #[error("Failed to render template {template}: {message}")]
    Render {
        /// Name or path of the template
        template: String,
        /// Cleaned-up Tera message
        message: String,
        /// Line number if Tera reported one
        line: Option<usize>,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A template source could not be opened or decoded
    #[error("Cannot read template source {path}: {reason}")]
    UnreadableSource {
        /// Path of the unreadable file
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl JsxError {
    /// Whether the error is a structural template-authoring mistake.
    #[must_use]
    pub const fn is_authoring_error(&self) -> bool {
        matches!(self, Self::NestedBlock { .. } | Self::UnclosedBlock { .. })
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`JsxError`] with an optional suggestion and extra details. Used by the
/// `compilejsx` binary to print errors in a consistent, coloured format.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: JsxError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: JsxError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach additional details about the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
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

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Known [`JsxError`] variants get tailored suggestions; IO and TOML errors are
/// mapped onto the closest variant; everything else keeps its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(jsx_error) = error.downcast_ref::<JsxError>() {
        return create_error_context(jsx_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return ErrorContext::new(JsxError::Other {
            message: format!("{error:#}"),
        })
        .with_details(format!("Underlying IO error kind: {:?}", io_error.kind()))
        .with_suggestion("Check that the path exists and that you have permission to access it");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(JsxError::Config {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your jsx.toml file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(JsxError::Other {
        message,
    })
}

fn create_error_context(error: JsxError) -> ErrorContext {
    let suggestion = match &error {
        JsxError::NestedBlock {
            ..
        } => Some("Close the outer block with {% endjsx %} before opening the next one"),
        JsxError::UnclosedBlock {
            ..
        } => Some("Add the missing {% endjsx %} tag"),
        JsxError::Render {
            ..
        } => Some(
            "Check template syntax: variables use {{ var }}, comments use {# #}, control flow uses {% %}",
        ),
        JsxError::Config {
            ..
        } => Some("Check jsx.toml (or the file named by COMPILEJSX_CONFIG) for typos and valid TOML"),
        JsxError::UnreadableSource {
            ..
        } => Some("Check that the file exists and is readable UTF-8 text"),
        JsxError::Other {
            ..
        } => None,
    };

    let details = match &error {
        JsxError::NestedBlock {
            ..
        } => Some(
            "A {% jsx %} block's body is fingerprinted verbatim and cannot contain another block"
                .to_string(),
        ),
        JsxError::Render {
            line: Some(line),
            ..
        } => Some(format!("Tera reported the problem at line {line}")),
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    ctx
}
