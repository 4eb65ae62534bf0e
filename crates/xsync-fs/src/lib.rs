//! Filesystem substrate for xsync
//!
//! Provides normalized path handling, SHA-256 content checksums, atomic
//! file I/O, and the on-disk layout constants shared by every other crate.

pub mod checksum;
pub mod error;
pub mod io;
pub mod layout;
pub mod names;
pub mod path;

pub use error::{Error, Result};
pub use layout::{SOURCE_EXT, StatePath};
pub use path::NormalizedPath;
