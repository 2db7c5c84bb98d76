//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod hash;
pub mod path;

pub use config::Config;
pub use context::GlobalContext;
pub use fs::{write_if_changed, TextEncoding, WriteOutcome};
pub use hash::{derive_guid, hash_for_path};
