use crate::context::ContentUri;
use std::path::PathBuf;

/// Everything that can stop a single save from completing.
///
/// Platform detection and SDK version lookups never show up here: a failed
/// detection means "desktop" and a failed version query means "legacy".
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Invalid filename {0:?}: must be a single non-empty path component")]
    InvalidFilename(String),
    #[error("A platform context is required for mobile storage")]
    MissingContext,
    #[error("Platform query for {capability} failed: {reason}")]
    PlatformQuery {
        capability: &'static str,
        reason: String,
    },
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open {path} for writing: {source}")]
    StreamAcquisition {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Media store refused to create {display_name}")]
    InsertRejected { display_name: String },
    #[error("No output stream available for {uri}")]
    StreamUnavailable { uri: ContentUri },
    #[error("Failed to write {uri}: {source}")]
    ContentWrite {
        uri: ContentUri,
        source: std::io::Error,
    },
}

impl SaveError {
    pub fn platform_query(capability: &'static str, reason: impl ToString) -> Self {
        SaveError::PlatformQuery {
            capability,
            reason: reason.to_string(),
        }
    }
}
