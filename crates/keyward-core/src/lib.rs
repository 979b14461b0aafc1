//! # keyward-core
//!
//! Core types, configuration, and utilities for Keyward.
//!
//! This crate provides shared functionality used across all Keyward crates:
//!
//! - **Configuration**: Loading, validation, and persistence of the store config
//! - **Secrets**: Zeroizing byte and text buffers plus the [`SecureClear`] utilities
//! - **Audit**: Structured audit events emitted by the secret store
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::StoreConfig;
pub use error::{ConfigError, Error, Result};
pub use secret::{secure_clear, SecretBytes, SecretString, SecureClear};
pub use types::*;
