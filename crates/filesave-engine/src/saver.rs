use crate::capability::StorageCapability;
use crate::context::{ContentUri, PlatformContext};
use crate::error::SaveError;
use crate::io;
use crate::media::PublicDirectory;
use crate::platform::Platform;
use crate::request::WriteRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings owned by a [`FileSaver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// On mobile, write to shared external storage instead of the app-private directory.
    /// Has no effect on desktop.
    pub external_mode: bool,
    /// Where scoped-storage writes land.
    pub public_directory: PublicDirectory,
}

/// Where a successful save put the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written by path.
    File(PathBuf),
    /// Written through the content resolver.
    Content(ContentUri),
}

/// Writes text files to whichever storage suits the platform and configuration.
///
/// The platform is fixed when the saver is built. Every call then runs exactly
/// one strategy, picked from the platform, `external_mode` and (for external
/// writes on mobile) the OS version reported by the context.
#[derive(Debug, Clone)]
pub struct FileSaver {
    config: WriterConfig,
    platform: Platform,
}

impl Default for FileSaver {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl FileSaver {
    pub fn new(config: WriterConfig) -> Self {
        Self::with_platform(config, Platform::detect())
    }

    pub fn with_platform(config: WriterConfig, platform: Platform) -> Self {
        Self { config, platform }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn external_mode(&self) -> bool {
        self.config.external_mode
    }

    pub fn set_external_mode(&mut self, external_mode: bool) {
        self.config.external_mode = external_mode;
    }

    /// The strategy a save with this context would use.
    pub fn strategy(&self, context: Option<&dyn PlatformContext>) -> StorageCapability {
        let sdk_version = match (self.platform, self.config.external_mode) {
            (Platform::Mobile, true) => context.and_then(|c| c.sdk_version()),
            _ => None,
        };
        StorageCapability::select(self.platform, self.config.external_mode, sdk_version)
    }

    /// Write `content` as `filename` inside `directory`.
    ///
    /// `context` is only used on mobile, where it is required.
    pub fn save(
        &self,
        context: Option<&dyn PlatformContext>,
        directory: &str,
        filename: &str,
        content: &str,
    ) -> Result<SaveOutcome, SaveError> {
        let strategy = self.strategy(context);
        log::debug!("Saving {filename} into {directory:?} via {strategy:?}");

        let outcome = match strategy {
            StorageCapability::Desktop => {
                io::write_desktop(directory, filename, content).map(SaveOutcome::File)
            }
            StorageCapability::MobileInternal => {
                let context = context.ok_or(SaveError::MissingContext)?;
                io::write_internal(context, directory, filename, content).map(SaveOutcome::File)
            }
            StorageCapability::MobileExternalLegacy => {
                let context = context.ok_or(SaveError::MissingContext)?;
                io::write_external_legacy(context, directory, filename, content)
                    .map(SaveOutcome::File)
            }
            StorageCapability::MobileExternalModern => {
                let context = context.ok_or(SaveError::MissingContext)?;
                io::write_external_modern(
                    context,
                    self.config.public_directory,
                    directory,
                    filename,
                    content,
                )
                .map(SaveOutcome::Content)
            }
        }?;

        match &outcome {
            SaveOutcome::File(path) => log::info!("Wrote {}", path.display()),
            SaveOutcome::Content(uri) => log::info!("Wrote {uri}"),
        }
        Ok(outcome)
    }

    pub fn save_request(
        &self,
        context: Option<&dyn PlatformContext>,
        request: &WriteRequest,
    ) -> Result<SaveOutcome, SaveError> {
        request.validate()?;
        self.save(
            context,
            &request.directory,
            &request.filename,
            &request.content,
        )
    }

    /// Save and log any failure instead of returning it.
    ///
    /// For callers such as button handlers that have nothing useful to do with
    /// an error. A failed save leaves no file, or a partially written one.
    pub fn save_or_log(
        &self,
        context: Option<&dyn PlatformContext>,
        directory: &str,
        filename: &str,
        content: &str,
    ) {
        if let Err(e) = self.save(context, directory, filename, content) {
            log::error!("Failed to save {filename}: {e}");
        }
    }
}
