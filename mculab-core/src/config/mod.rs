//! Configuration types
//!
//! Board-agnostic lab configuration, embedded in the firmware image as
//! postcard binary data.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
