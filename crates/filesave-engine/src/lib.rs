pub mod capability;
pub mod context;
pub mod error;
pub mod io;
pub mod media;
pub mod platform;
pub mod request;
pub mod saver;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use capability::*;
pub use context::*;
pub use error::*;
pub use media::*;
pub use platform::Platform;
pub use request::*;
pub use saver::*;
