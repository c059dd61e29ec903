use crate::context::{ContentResolver, ContentUri, PlatformContext};
use crate::error::SaveError;
use crate::media::MediaRecord;
use std::cell::{Cell, RefCell, RefMut};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory to write into
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a plain file, e.g. to block a directory name
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Android context stand-in backed by a temp dir and an in-memory media store.
pub struct FakeContext {
    root: TempDir,
    pub sdk_version: Option<i32>,
    pub accept_inserts: bool,
    pub provide_stream: bool,
    pub fail_stream_writes: bool,
    pub fail_directory_queries: bool,
    pub inserted: RefCell<Vec<(String, MediaRecord)>>,
    pub written: RefCell<Vec<u8>>,
    pub streams_opened: Cell<usize>,
}

impl FakeContext {
    pub fn new(sdk_version: Option<i32>) -> Self {
        Self {
            root: create_test_dir(),
            sdk_version,
            accept_inserts: true,
            provide_stream: true,
            fail_stream_writes: false,
            fail_directory_queries: false,
            inserted: RefCell::new(Vec::new()),
            written: RefCell::new(Vec::new()),
            streams_opened: Cell::new(0),
        }
    }

    pub fn files_root(&self) -> PathBuf {
        self.root.path().join("data/files")
    }

    pub fn external_root(&self) -> PathBuf {
        self.root.path().join("sdcard")
    }

    pub fn written_text(&self) -> String {
        String::from_utf8(self.written.borrow().clone()).unwrap()
    }

    fn directory(&self, capability: &'static str, path: PathBuf) -> Result<PathBuf, SaveError> {
        if self.fail_directory_queries {
            return Err(SaveError::platform_query(capability, "context unavailable"));
        }
        Ok(path)
    }
}

impl PlatformContext for FakeContext {
    fn files_dir(&self) -> Result<PathBuf, SaveError> {
        self.directory("files dir", self.files_root())
    }

    fn external_storage_dir(&self) -> Result<PathBuf, SaveError> {
        self.directory("external storage dir", self.external_root())
    }

    fn sdk_version(&self) -> Option<i32> {
        self.sdk_version
    }

    fn content_resolver(&self) -> Result<&dyn ContentResolver, SaveError> {
        Ok(self)
    }
}

impl ContentResolver for FakeContext {
    fn insert(&self, volume: &str, record: &MediaRecord) -> Result<Option<ContentUri>, SaveError> {
        if !self.accept_inserts {
            return Ok(None);
        }
        let mut inserted = self.inserted.borrow_mut();
        inserted.push((volume.to_string(), record.clone()));
        Ok(Some(ContentUri::new(format!(
            "content://media/{volume}/file/{}",
            inserted.len()
        ))))
    }

    fn open_output_stream(
        &self,
        _uri: &ContentUri,
    ) -> Result<Option<Box<dyn Write + '_>>, SaveError> {
        if !self.provide_stream {
            return Ok(None);
        }
        self.streams_opened.set(self.streams_opened.get() + 1);
        let mut buffer = self.written.borrow_mut();
        buffer.clear();
        Ok(Some(Box::new(CapturingStream {
            buffer,
            fail: self.fail_stream_writes,
        })))
    }
}

struct CapturingStream<'a> {
    buffer: RefMut<'a, Vec<u8>>,
    fail: bool,
}

impl Write for CapturingStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::other("no space left on device"));
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
