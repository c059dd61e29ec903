use crate::error::SaveError;

/// A single file to write: where, under what name, and what text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Directory relative to the storage root, or an absolute path on desktop.
    /// Empty means the root itself.
    pub directory: String,
    pub filename: String,
    pub content: String,
}

impl WriteRequest {
    pub fn new(
        directory: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Reject filenames that would place the file outside its directory.
    pub fn validate(&self) -> Result<(), SaveError> {
        validate_filename(&self.filename)
    }
}

pub fn validate_filename(filename: &str) -> Result<(), SaveError> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\']);

    if invalid {
        return Err(SaveError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
