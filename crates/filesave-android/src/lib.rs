//! JNI bindings for calling filesave from Android apps
//!
//! The Java side declares, on `filesave.FileUtils`:
//!
//! ```java
//! static native boolean saveFile(
//!     Context context, String path, String filename, String content, boolean external);
//! ```
//!
//! Apps built on a native activity can call [`save_with_ndk_context`] instead.
//! On other targets this crate is empty.

#[cfg(target_os = "android")]
mod android;

#[cfg(target_os = "android")]
pub use android::*;
