//! Platform-specific functionality
//!
//! Desktop builds write straight to the filesystem. Android builds reach the
//! host through JNI, see [`android::AndroidContext`].

#[cfg(target_os = "android")]
pub mod android;

/// The kind of host the writer runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Mobile,
}

impl Platform {
    /// Resolve the current host. Android builds are mobile, everything else is desktop.
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Platform::Mobile
    }
}

/// Whether this process runs inside the mobile host runtime.
pub fn is_mobile_platform() -> bool {
    Platform::detect().is_mobile()
}
