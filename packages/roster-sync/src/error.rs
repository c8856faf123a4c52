//! Typed errors for the roster sync engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`); the binary wraps
//! these with `anyhow` context at the top level.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while pulling a listing from one source.
///
/// None of these abort a run. The collector downgrades them to a
/// `Degraded` or `Unavailable` status for the offending source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request did not complete within its time box
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Transport-level failure (DNS, TLS, connection reset, body read)
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The source answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// A configured or extracted URL could not be parsed or joined
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Expected markup was missing from an otherwise successful response
    #[error("expected markup missing: {marker}")]
    StructureChanged { marker: String },

    /// A CSS selector failed to compile
    #[error("invalid selector {css}: {reason}")]
    Selector { css: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    /// True when the source responded but its layout no longer matches.
    pub fn is_structural(&self) -> bool {
        matches!(self, SourceError::StructureChanged { .. })
    }
}

/// Errors from ledger persistence.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which durable output a publish step was writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Snapshot,
    NewlyAdded,
    Ledger,
    Metadata,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Snapshot => "snapshot",
            Artifact::NewlyAdded => "newly-added",
            Artifact::Ledger => "ledger",
            Artifact::Metadata => "run metadata",
        };
        f.write_str(name)
    }
}

/// A commit-phase write failed. The run is reported as failed.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write {artifact} to {path}: {source}")]
    Io {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {artifact}: {source}")]
    Encode {
        artifact: Artifact,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to persist ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Run-level errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("source setup failed: {0}")]
    Source(#[from] SourceError),
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
