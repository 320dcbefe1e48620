//! Error types for the scaling plan library.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Comprehensive error type for all scaling plan operations.
#[derive(Error, Debug)]
pub enum ScalingPlanError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No plan stored under the given ID
    #[error("Plan '{id}' not found")]
    PlanNotFound { id: String },
    /// A plan with the given ID already exists
    #[error("Plan '{id}' already exists")]
    PlanExists { id: String },
    /// No plan item with the given ID in the current plan
    #[error("Plan item '{item_id}' not found in plan '{plan_id}'")]
    PlanItemNotFound { plan_id: String, item_id: String },
    /// An operation on the current plan was issued before any `load`
    #[error("No plan is loaded")]
    NoCurrentPlan,
    /// YAML document could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] CodecError),
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_yaml::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ScalingPlanError {
        ScalingPlanError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ScalingPlanError {
        ScalingPlanError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ScalingPlanError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a failed `spawn_blocking` join.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }

    /// Returns the editor annotation for parse errors.
    pub fn annotation(&self) -> Option<&CodecError> {
        match self {
            Self::Parse(error) => Some(error),
            _ => None,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ScalingPlanError::database(message).with_source(e))
    }
}

/// Result type alias for scaling plan operations
pub type Result<T> = std::result::Result<T, ScalingPlanError>;
