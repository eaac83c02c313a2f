//! CLI utilities for yotts.
//!
//! This crate provides the context configuration and directory layout
//! shared by the `yotts` binary and the plugin.

pub mod config;
pub mod paths;

pub use config::{Config, Context, load_config, mask_api_key};
pub use paths::Paths;
