//! Metadata for files created through the media store.
//!
//! On scoped storage a file is not opened by path. A record describing it is
//! inserted first and the platform hands back a content handle to stream into.

use serde::{Deserialize, Serialize};

/// Media store column holding the file name.
pub const DISPLAY_NAME: &str = "_display_name";
/// Media store column holding the MIME type.
pub const MIME_TYPE: &str = "mime_type";
/// Media store column holding the path below the volume root.
pub const RELATIVE_PATH: &str = "relative_path";

pub const TEXT_PLAIN: &str = "text/plain";

/// Public top-level directory that scoped-storage writes land in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicDirectory {
    #[default]
    Downloads,
    Documents,
}

impl PublicDirectory {
    /// Directory name as the platform spells it (`Environment.DIRECTORY_*`).
    pub fn as_str(self) -> &'static str {
        match self {
            PublicDirectory::Downloads => "Download",
            PublicDirectory::Documents => "Documents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "_display_name")]
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
}

impl MediaRecord {
    /// Describe a plain text file named `filename` inside `directory` of the public directory.
    pub fn text_file(public_dir: PublicDirectory, directory: &str, filename: &str) -> Self {
        Self {
            display_name: filename.to_string(),
            mime_type: TEXT_PLAIN.to_string(),
            relative_path: format!(
                "{}/{}",
                public_dir.as_str(),
                directory.trim_start_matches('/')
            ),
        }
    }

    /// Column/value pairs in insertion order.
    pub fn columns(&self) -> [(&'static str, &str); 3] {
        [
            (DISPLAY_NAME, self.display_name.as_str()),
            (MIME_TYPE, self.mime_type.as_str()),
            (RELATIVE_PATH, self.relative_path.as_str()),
        ]
    }
}
