/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template conversion.

use thiserror::Error;

/// Errors that make a single template unconvertible.
///
/// Unresolved tag kinds are not errors: they are reported through
/// [`crate::Conversion::ambiguous`] and the file still converts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// A closing tag was found with no open block left to close.
    #[error("Unbalanced closing tag {tag} at line {line}, column {column}: no open block to close")]
    UnbalancedCloser {
        tag: String,
        line: usize,
        column: usize,
    },

    /// A tag matched the control-tag pattern but does not start with `#`, `^` or `/`.
    #[error("Unknown control character '{found}' in tag {tag}")]
    UnknownControlChar { found: char, tag: String },
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
