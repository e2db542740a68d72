//! Storage error types.

use snl_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or persisting game state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage directory creation failed.
    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored snapshot was written by an unsupported version.
    #[error("version incompatible: file version {file_version}, supported {supported_version}")]
    VersionIncompatible {
        file_version: u32,
        supported_version: u32,
    },

    /// The stored snapshot breaks a game invariant.
    #[error("corrupted state: {0}")]
    Corrupted(String),

    /// The backing store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Creates a Corrupted error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORE_IO",
            Self::Serialization(_) => "STORE_SERIALIZATION",
            Self::DirectoryCreation { .. } => "STORE_DIRECTORY_CREATION",
            Self::VersionIncompatible { .. } => "STORE_VERSION_INCOMPATIBLE",
            Self::Corrupted(_) => "STORE_CORRUPTED",
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }
}
