//! Error type shared by every engine component

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, persisting or querying a rank table
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid evaluator or table configuration (phase dependency, load factor, capacity)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed input: bad card string, wrong card count, zero key
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup of a card set that was never stored in the table
    #[error("no rank stored for card set {0:#015x}")]
    NotFound(u64),

    /// Disk I/O failed; corrupt files surface as `io::ErrorKind::InvalidData`
    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A shard ran out of free slots during insertion
    #[error("shard {0} is saturated; increase the load factor")]
    ShardFull(usize),

    /// Classifier/indexer disagreement during table construction. Fatal.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// Table construction was cancelled by the caller
    #[error("table construction cancelled")]
    Cancelled,
}

impl Error {
    /// Wrap an I/O error with the operation and path it belongs to
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, Error>;
