//! The storage strategies and the shared directory-ensuring writer.

use crate::capability::StorageCapability;
use crate::context::{ContentUri, EXTERNAL_VOLUME, PlatformContext};
use crate::error::SaveError;
use crate::media::{MediaRecord, PublicDirectory};
use crate::request::validate_filename;
use crate::saver::SaveOutcome;
use relative_path::RelativePath;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `content` to `base/relative_dir/filename`, creating missing directories.
///
/// The file is truncated first, so repeated writes replace rather than append.
/// Returns the path written.
pub fn write_into(
    base: &Path,
    relative_dir: &RelativePath,
    filename: &str,
    content: &str,
) -> Result<PathBuf, SaveError> {
    validate_filename(filename)?;
    let target_dir = relative_dir.to_path(base);

    if !target_dir.is_dir() {
        log::debug!("Creating directory {}", target_dir.display());
        fs::create_dir_all(&target_dir).map_err(|source| SaveError::DirectoryCreation {
            path: target_dir.clone(),
            source,
        })?;
    }

    let path = target_dir.join(filename);
    let mut file = File::create(&path).map_err(|source| SaveError::StreamAcquisition {
        path: path.clone(),
        source,
    })?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| SaveError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// Absolute directories are used as given, relative ones hang off `cwd`.
pub fn resolve_desktop_dir(cwd: &Path, directory: &str) -> PathBuf {
    let directory = Path::new(directory);
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        cwd.join(directory)
    }
}

/// Write relative to the process working directory (or to an absolute directory).
pub fn write_desktop(directory: &str, filename: &str, content: &str) -> Result<PathBuf, SaveError> {
    let cwd = std::env::current_dir()
        .map_err(|e| SaveError::platform_query("working directory", e))?;
    let target_dir = resolve_desktop_dir(&cwd, directory);
    write_into(&target_dir, RelativePath::new(""), filename, content)
}

/// Write below the app-private files directory.
pub fn write_internal(
    context: &dyn PlatformContext,
    directory: &str,
    filename: &str,
    content: &str,
) -> Result<PathBuf, SaveError> {
    let base = context.files_dir()?;
    write_into(&base, RelativePath::new(directory), filename, content)
}

/// Write below the shared external storage root by path (pre scoped storage).
pub fn write_external_legacy(
    context: &dyn PlatformContext,
    directory: &str,
    filename: &str,
    content: &str,
) -> Result<PathBuf, SaveError> {
    let base = context.external_storage_dir()?;
    write_into(&base, RelativePath::new(directory), filename, content)
}

/// Create the file through the content resolver and stream the content into it.
///
/// Nothing is written unless the insert yields a handle and that handle opens
/// to a stream.
pub fn write_external_modern(
    context: &dyn PlatformContext,
    public_dir: PublicDirectory,
    directory: &str,
    filename: &str,
    content: &str,
) -> Result<ContentUri, SaveError> {
    validate_filename(filename)?;
    let record = MediaRecord::text_file(public_dir, directory, filename);
    let resolver = context.content_resolver()?;

    let uri = resolver
        .insert(EXTERNAL_VOLUME, &record)?
        .ok_or_else(|| SaveError::InsertRejected {
            display_name: record.display_name.clone(),
        })?;
    log::debug!("Inserted {} as {uri}", record.relative_path);

    let Some(mut stream) = resolver.open_output_stream(&uri)? else {
        return Err(SaveError::StreamUnavailable { uri });
    };
    stream
        .write_all(content.as_bytes())
        .and_then(|()| stream.flush())
        .map_err(|source| SaveError::ContentWrite {
            uri: uri.clone(),
            source,
        })?;
    drop(stream);

    Ok(uri)
}

/// External write, split on the OS version: scoped storage from API 29, direct paths before.
pub fn write_external(
    context: &dyn PlatformContext,
    public_dir: PublicDirectory,
    directory: &str,
    filename: &str,
    content: &str,
) -> Result<SaveOutcome, SaveError> {
    let capability = StorageCapability::select(
        crate::platform::Platform::Mobile,
        true,
        context.sdk_version(),
    );
    match capability {
        StorageCapability::MobileExternalModern => {
            write_external_modern(context, public_dir, directory, filename, content)
                .map(SaveOutcome::Content)
        }
        _ => write_external_legacy(context, directory, filename, content).map(SaveOutcome::File),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{FakeContext, create_test_dir, create_test_file};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_into_creates_nested_directories() {
        let dir = create_test_dir();

        let path = write_into(dir.path(), RelativePath::new("a/b/c"), "test.txt", "hello").unwrap();

        assert_eq!(path, dir.path().join("a").join("b").join("c").join("test.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_into_empty_directory_uses_base() {
        let dir = create_test_dir();

        let path = write_into(dir.path(), RelativePath::new(""), "test.txt", "hello").unwrap();

        assert_eq!(path, dir.path().join("test.txt"));
    }

    #[test]
    fn test_write_into_writes_exact_bytes() {
        let dir = create_test_dir();
        let content = "line one\nline two\r\nünïcødé ✓ 🦀";

        let path = write_into(dir.path(), RelativePath::new("x"), "bytes.txt", content).unwrap();

        assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
    }

    #[test]
    fn test_write_into_truncates_existing_file() {
        let dir = create_test_dir();
        let long = "a much longer piece of original content";
        write_into(dir.path(), RelativePath::new(""), "test.txt", long).unwrap();

        for _ in 0..3 {
            write_into(dir.path(), RelativePath::new(""), "test.txt", "short").unwrap();
        }

        assert_eq!(
            fs::read_to_string(dir.path().join("test.txt")).unwrap(),
            "short"
        );
    }

    #[test]
    fn test_write_into_directory_blocked_by_file() {
        let dir = create_test_dir();
        create_test_file(dir.path(), "test", "not a directory");

        let result = write_into(dir.path(), RelativePath::new("test"), "test.txt", "hello");

        assert!(matches!(result, Err(SaveError::DirectoryCreation { .. })));
        // The blocking file is untouched and nothing was written next to it
        assert_eq!(
            fs::read_to_string(dir.path().join("test")).unwrap(),
            "not a directory"
        );
        assert!(!dir.path().join("test.txt").exists());
    }

    #[test]
    fn test_write_into_rejects_bad_filename() {
        let dir = create_test_dir();

        let result = write_into(dir.path(), RelativePath::new("sub"), "../up.txt", "x");

        assert!(matches!(result, Err(SaveError::InvalidFilename(_))));
        assert!(!dir.path().join("sub").exists());
        assert!(!dir.path().join("up.txt").exists());
    }

    #[test]
    fn test_write_into_target_is_directory() {
        let dir = create_test_dir();
        fs::create_dir(dir.path().join("test.txt")).unwrap();

        let result = write_into(dir.path(), RelativePath::new(""), "test.txt", "x");

        assert!(matches!(result, Err(SaveError::StreamAcquisition { .. })));
    }

    #[test]
    fn test_resolve_desktop_dir_relative() {
        let cwd = Path::new("/home/user/project");
        assert_eq!(
            resolve_desktop_dir(cwd, "test"),
            PathBuf::from("/home/user/project/test")
        );
    }

    #[test]
    fn test_resolve_desktop_dir_absolute() {
        let dir = create_test_dir();
        let absolute = dir.path().to_string_lossy().to_string();
        assert_eq!(
            resolve_desktop_dir(Path::new("/somewhere/else"), &absolute),
            dir.path()
        );
    }

    #[test]
    fn test_write_desktop_absolute_directory() {
        let dir = create_test_dir();
        let target = dir.path().join("out");

        let path = write_desktop(&target.to_string_lossy(), "test.txt", "test content").unwrap();

        assert_eq!(path, target.join("test.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }

    #[test]
    fn test_write_internal_uses_files_dir() {
        let context = FakeContext::new(Some(33));

        let path = write_internal(&context, "test", "test.txt", "test content").unwrap();

        assert_eq!(path, context.files_root().join("test").join("test.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }

    #[test]
    fn test_write_internal_query_failure() {
        let mut context = FakeContext::new(Some(33));
        context.fail_directory_queries = true;

        let result = write_internal(&context, "test", "test.txt", "x");

        assert!(matches!(
            result,
            Err(SaveError::PlatformQuery {
                capability: "files dir",
                ..
            })
        ));
    }

    #[test]
    fn test_write_external_legacy_uses_external_root() {
        let context = FakeContext::new(Some(28));

        let path = write_external_legacy(&context, "test", "test.txt", "test content").unwrap();

        assert_eq!(path, context.external_root().join("test").join("test.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }

    #[test]
    fn test_write_external_modern_inserts_then_streams() {
        let context = FakeContext::new(Some(29));

        let uri = write_external_modern(
            &context,
            PublicDirectory::Downloads,
            "test",
            "test.txt",
            "test content",
        )
        .unwrap();

        assert_eq!(uri.as_str(), "content://media/external/file/1");
        let inserted = context.inserted.borrow();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0, EXTERNAL_VOLUME);
        assert_eq!(
            inserted[0].1,
            MediaRecord::text_file(PublicDirectory::Downloads, "test", "test.txt")
        );
        assert_eq!(context.written_text(), "test content");
    }

    #[test]
    fn test_write_external_modern_insert_rejected() {
        let mut context = FakeContext::new(Some(30));
        context.accept_inserts = false;

        let result = write_external_modern(
            &context,
            PublicDirectory::Downloads,
            "test",
            "test.txt",
            "x",
        );

        assert!(matches!(
            result,
            Err(SaveError::InsertRejected { display_name }) if display_name == "test.txt"
        ));
        assert_eq!(context.streams_opened.get(), 0);
        assert!(context.written.borrow().is_empty());
    }

    #[test]
    fn test_write_external_modern_no_stream() {
        let mut context = FakeContext::new(Some(30));
        context.provide_stream = false;

        let result = write_external_modern(
            &context,
            PublicDirectory::Downloads,
            "test",
            "test.txt",
            "x",
        );

        assert!(matches!(result, Err(SaveError::StreamUnavailable { .. })));
        assert!(context.written.borrow().is_empty());
    }

    #[test]
    fn test_write_external_modern_stream_failure() {
        let mut context = FakeContext::new(Some(30));
        context.fail_stream_writes = true;

        let result = write_external_modern(
            &context,
            PublicDirectory::Downloads,
            "test",
            "test.txt",
            "x",
        );

        assert!(matches!(result, Err(SaveError::ContentWrite { .. })));
    }

    #[test]
    fn test_write_external_dispatches_on_sdk_version() {
        let legacy = FakeContext::new(Some(28));
        let outcome =
            write_external(&legacy, PublicDirectory::Downloads, "test", "a.txt", "x").unwrap();
        assert_eq!(
            outcome,
            SaveOutcome::File(legacy.external_root().join("test").join("a.txt"))
        );
        assert!(legacy.inserted.borrow().is_empty());

        let modern = FakeContext::new(Some(29));
        let outcome =
            write_external(&modern, PublicDirectory::Downloads, "test", "a.txt", "x").unwrap();
        assert!(matches!(outcome, SaveOutcome::Content(_)));
        assert!(!modern.external_root().exists());
    }

    #[test]
    fn test_write_external_unknown_version_is_legacy() {
        let context = FakeContext::new(None);

        let outcome =
            write_external(&context, PublicDirectory::Downloads, "test", "a.txt", "x").unwrap();

        assert!(matches!(outcome, SaveOutcome::File(_)));
    }
}
