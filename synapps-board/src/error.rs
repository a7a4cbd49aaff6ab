//! Error types for the board client core

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Top-level error for store operations that talk to the remote store
#[derive(Debug, Error)]
pub enum BoardError {
    /// A data-access call failed
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A loaded board references data that cannot be placed on it
    #[error("board {board_id} is inconsistent: {message}")]
    Inconsistent { board_id: String, message: String },
}

/// A gesture that cannot be resolved against the current columns.
///
/// Reconciliation fails closed on any of these: the columns are left
/// untouched and no persistence instructions are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The drop list id does not name a column on the board
    #[error("column not found for list '{list_id}'")]
    ColumnNotFound { list_id: String },

    /// Nothing to drag at the source index
    #[error("no {kind} at index {index} in list '{list_id}' ({len} entries)")]
    SourceOutOfBounds {
        kind: &'static str,
        list_id: String,
        index: usize,
        len: usize,
    },
}

impl ReconcileError {
    /// Create a column-not-found error
    pub fn column_not_found(list_id: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            list_id: list_id.into(),
        }
    }

    /// Create a source-out-of-bounds error
    pub fn source_out_of_bounds(
        kind: &'static str,
        list_id: impl Into<String>,
        index: usize,
        len: usize,
    ) -> Self {
        Self::SourceOutOfBounds {
            kind,
            list_id: list_id.into(),
            index,
            len,
        }
    }
}

/// Failure reported by a [`BoardApi`](crate::api::BoardApi) call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The remote store has no such entity
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The remote store rejected the write as conflicting
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Any other rejection carrying a status code
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The call did not complete within the configured timeout
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The request never reached the remote store
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl RequestError {
    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a rejection with a status code
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Check if a caller-side retry could succeed.
    ///
    /// The sequencer never retries; this is for callers that queue failed
    /// instructions themselves.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::NotFound { .. } | Self::Conflict { .. } => false,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("failed to parse configuration: {source}")]
    Parse {
        #[source]
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Parse {
            source: Box::new(error),
        }
    }
}
