//! Shared helpers used by the configuration and storage layers

/// Environment variable loading utilities
pub mod env_loader;

/// Error mapping helpers for storage and IO failures
pub mod error_context;

pub use env_loader::EnvLoader;
pub use error_context::{io_error_with_context, StorageResultExt};
