//! The host capabilities the mobile strategies need.
//!
//! The writer never builds a context itself. The embedding app supplies one
//! (on Android, [`crate::platform::android::AndroidContext`]) and the writer
//! only asks it for directories, the OS version and a content resolver.

use crate::error::SaveError;
use crate::media::MediaRecord;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Volume name of the shared files collection.
pub const EXTERNAL_VOLUME: &str = "external";

/// Opaque handle to an item created through a [`ContentResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri(String);

impl ContentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait PlatformContext {
    /// App-private files directory.
    fn files_dir(&self) -> Result<PathBuf, SaveError>;

    /// Root of the shared external storage, for direct path access.
    fn external_storage_dir(&self) -> Result<PathBuf, SaveError>;

    /// OS API level, or `None` if it could not be read.
    fn sdk_version(&self) -> Option<i32>;

    fn content_resolver(&self) -> Result<&dyn ContentResolver, SaveError>;
}

pub trait ContentResolver {
    /// Register `record` in the collection for `volume`.
    ///
    /// `Ok(None)` means the platform declined to create the item.
    fn insert(&self, volume: &str, record: &MediaRecord) -> Result<Option<ContentUri>, SaveError>;

    /// Open a writable stream for an inserted item. The stream is closed on drop.
    ///
    /// `Ok(None)` means the platform returned no stream.
    fn open_output_stream(
        &self,
        uri: &ContentUri,
    ) -> Result<Option<Box<dyn Write + '_>>, SaveError>;
}
