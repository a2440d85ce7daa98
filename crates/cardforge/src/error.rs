//! Error types for cardforge.
//!
//! Validation gates never produce errors: a blocked wizard step or a rejected
//! settings save is reported through an outcome value. The variants below
//! cover the I/O edges of the application.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cardforge operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Profile Errors ===
    /// A field name did not match any profile field.
    #[error("unknown profile field '{0}'")]
    UnknownField(String),

    /// A command or `FIELD=VALUE` pair could not be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An avatar image could not be imported.
    #[error("failed to import avatar from {path}: {message}")]
    AvatarImport {
        /// Path of the selected file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Scan Code Errors ===
    /// The QR code image could not be generated.
    #[error("scan code generation failed: {0}")]
    CodeGeneration(String),

    /// A download was requested before generation completed.
    #[error("scan code is not ready yet")]
    CodeNotReady,

    // === Platform Errors ===
    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cardforge operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Create a new scan code generation error.
    #[must_use]
    pub fn code_generation(message: impl Into<String>) -> Self {
        Self::CodeGeneration(message.into())
    }

    /// Create an avatar import error for the given file.
    #[must_use]
    pub fn avatar_import(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::AvatarImport {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the scan code is still pending.
    #[must_use]
    pub fn is_code_not_ready(&self) -> bool {
        matches!(self, Self::CodeNotReady)
    }
}
