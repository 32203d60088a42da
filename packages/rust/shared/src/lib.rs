//! Shared types, error model, and configuration for docrelay.
//!
//! This crate is the foundation depended on by all other docrelay crates.
//! It provides:
//! - [`DocRelayError`] — the unified error type
//! - Domain types ([`InvocationId`], [`IngestionJob`], [`HandlerResponse`])
//! - Configuration ([`AppConfig`], [`HandlerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AuthConfig, EndpointsConfig, HandlerConfig, OciConfig, ServerConfig,
    StorageConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DocRelayError, Result};
pub use types::{HandlerResponse, IngestionJob, InvocationId};
