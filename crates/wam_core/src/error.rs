//! Error types for wam_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wam_core operations.
#[derive(Error, Debug)]
pub enum WamError {
    /// The underlying key-value store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error while encoding a record.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error while decoding a stored record.
    #[error("deserialization error at key {key:?}: {reason}")]
    Deserialization {
        /// Storage key of the undecodable record
        key: String,
        /// Decoder message
        reason: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A project with this name already exists.
    #[error("project name already in use: {0}")]
    ProjectNameTaken(String),

    /// Project names double as primary keys and cannot be blank.
    #[error("invalid project name: {0:?}")]
    InvalidProjectName(String),

    /// Project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// Page was not found.
    #[error("page not found: {0}")]
    PageNotFound(String),

    /// Finalized request was not found.
    #[error("request not found: {0}")]
    RequestNotFound(String),

    /// No project is active to receive captured traffic.
    #[error("no active project")]
    NoActiveProject,

    /// A headers/completed event arrived for a transaction with no builder.
    #[error("no request builder for transaction {0}")]
    MissingBuilder(String),

    /// No `.wam` directory at the given path.
    #[error("not a wam repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// `.wam` directory already exists.
    #[error("wam repository already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

impl WamError {
    /// Wraps any displayable backend error as a storage failure.
    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ProjectNameTaken(_) => Some("Pick another name, or run 'wam project list'."),
            Self::InvalidProjectName(_) => Some("Project names must contain a non-blank character."),
            Self::ProjectNotFound(_) => {
                Some("Run 'wam project list' to see existing projects.")
            }
            Self::NoActiveProject => {
                Some("Create one with 'wam project create' or pick one with 'wam project activate'.")
            }
            Self::NotARepository(_) => Some("Run 'wam init' first."),
            Self::AlreadyInitialized(_) => {
                Some("Use the existing repository, or remove the .wam directory to start over.")
            }
            Self::Storage(_) => {
                Some("Another process might hold the store open. Close it and retry.")
            }
            Self::Deserialization { .. } => {
                Some("The store holds a record written by an incompatible version.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for wam_core operations.
pub type Result<T> = std::result::Result<T, WamError>;
