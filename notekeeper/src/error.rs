//! Unified error handling for the notekeeper library
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! separates the failures a caller is expected to react to (validation, unknown
//! ids, failed writes) from soft failures that the repository absorbs itself.

use std::fmt;
use std::io;
use thiserror::Error;

/// The main error type for the notekeeper library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoteKeeperError {
    /// A required note field was missing or empty
    #[error("Validation failed for field '{field}': {reason}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No note with the given id exists in the collection
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// The durable snapshot could not be read or parsed
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// The durable snapshot could not be written
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// A note id was empty or otherwise unusable
    #[error("Invalid note id: {0}")]
    InvalidNoteId(String),

    /// A date string could not be interpreted
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML configuration could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// Description of the operation that failed
        message: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl NoteKeeperError {
    /// Build a validation error for a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build an invalid id error
    pub fn invalid_note_id(id: &str) -> Self {
        Self::InvalidNoteId(format!("'{id}' is not a usable note id"))
    }

    /// True for [`NoteKeeperError::Validation`]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// True for [`NoteKeeperError::NoteNotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound(_))
    }

    /// True for either direction of storage failure
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageRead(_) | Self::StorageWrite(_))
    }
}

/// Result type alias for notekeeper operations
pub type Result<T> = std::result::Result<T, NoteKeeperError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| NoteKeeperError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl<'a> fmt::Display for ErrorChain<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}
