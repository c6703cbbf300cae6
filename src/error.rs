//! Error types for race replay.
//!
//! All errors implement `std::error::Error` and carry structured context for
//! debugging and recovery guidance.
//!
//! ## Error Categories
//!
//! - **Startup Errors**: empty dataset or invalid game configuration. These are
//!   fatal: a feed is never built with an undefined clock.
//! - **Dataset Errors**: unreadable files, malformed rows, broken roster references
//! - **Storage Errors**: a backing store failed while serving a request
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use regatta::ReplayError;
//!
//! let error = ReplayError::invalid_configuration("timer must be greater than zero");
//! assert!(error.is_fatal());
//! assert!(!error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for replay operations.
pub type Result<T, E = ReplayError> = std::result::Result<T, E>;

/// Main error type for replay operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReplayError {
    #[error("Race dataset contains no observations")]
    EmptyDataset,

    #[error("Invalid game configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Dataset file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Observation {observation_id} references unknown boat '{nat_voile}'")]
    UnknownBoat { nat_voile: String, observation_id: i64 },

    #[error("Boat '{nat_voile}' appears more than once in the roster")]
    DuplicateBoat { nat_voile: String },

    #[error("Timeline store failure: {reason}")]
    Storage {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ReplayError {
    /// Returns whether this error must abort startup.
    pub fn is_fatal(&self) -> bool {
        match self {
            ReplayError::EmptyDataset => true,
            ReplayError::InvalidConfiguration { .. } => true,
            ReplayError::File { .. } => true,
            ReplayError::Parse { .. } => true,
            ReplayError::UnknownBoat { .. } => true,
            ReplayError::DuplicateBoat { .. } => true,
            ReplayError::Storage { .. } => false,
        }
    }

    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// The core never retries on its own; the answer is for the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReplayError::Storage { .. })
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ReplayError::EmptyDataset => vec![
                "Run the ingestion step before starting the replay",
                "Check that race.csv contains at least one data row",
            ],
            ReplayError::InvalidConfiguration { .. } => vec![
                "Set `timer` in config.yaml to a positive number of minutes",
                "Check the REGATTA_TIMER environment variable",
            ],
            ReplayError::File { .. } => vec![
                "Check file exists and is readable",
                "Verify the dataset directory path",
                "Check file permissions",
            ],
            ReplayError::Parse { .. } => vec![
                "Check data format compatibility",
                "Timestamps must use the YYYY-MM-DD HH:MM:SS format",
                "Verify source data integrity",
            ],
            ReplayError::UnknownBoat { .. } | ReplayError::DuplicateBoat { .. } => vec![
                "Re-run the ingestion step to rebuild the roster",
                "Verify registration codes match between boats.csv and race.csv",
            ],
            ReplayError::Storage { .. } => vec![
                "Check that the backing store is reachable",
                "Retry the request",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        ReplayError::File { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        ReplayError::InvalidConfiguration { reason: reason.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        ReplayError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for storage failures.
    pub fn storage_failed(reason: impl Into<String>) -> Self {
        ReplayError::Storage { reason: reason.into(), source: None }
    }

    /// Helper constructor for storage failures with source.
    pub fn storage_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        ReplayError::Storage { reason: reason.into(), source: Some(source) }
    }
}

impl From<csv::Error> for ReplayError {
    fn from(err: csv::Error) -> Self {
        let context = match err.position() {
            Some(pos) => format!("CSV record {} (line {})", pos.record(), pos.line()),
            None => "CSV input".to_string(),
        };
        ReplayError::Parse { context, details: err.to_string() }
    }
}

impl From<serde_yaml_ng::Error> for ReplayError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        ReplayError::Parse { context: "game configuration".to_string(), details: err.to_string() }
    }
}
