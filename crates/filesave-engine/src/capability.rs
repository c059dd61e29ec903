use crate::platform::Platform;

/// First Android API level with scoped storage (Android 10).
pub const SCOPED_STORAGE_MIN_SDK: i32 = 29;

/// The storage path a single save call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCapability {
    /// Plain filesystem write relative to the working directory.
    Desktop,
    /// App-private files directory.
    MobileInternal,
    /// Direct path under the shared external storage root (before API 29).
    MobileExternalLegacy,
    /// Media store insert followed by a stream write (API 29 and later).
    MobileExternalModern,
}

impl StorageCapability {
    /// Pick the strategy for a call.
    ///
    /// `sdk_version` is only consulted for external writes on mobile; `None`
    /// (the version could not be read) falls back to the legacy path.
    pub fn select(platform: Platform, external_mode: bool, sdk_version: Option<i32>) -> Self {
        match platform {
            Platform::Desktop => StorageCapability::Desktop,
            Platform::Mobile if !external_mode => StorageCapability::MobileInternal,
            Platform::Mobile => match sdk_version {
                Some(sdk) if sdk >= SCOPED_STORAGE_MIN_SDK => {
                    StorageCapability::MobileExternalModern
                }
                _ => StorageCapability::MobileExternalLegacy,
            },
        }
    }

    pub fn is_mobile(self) -> bool {
        self != StorageCapability::Desktop
    }
}
