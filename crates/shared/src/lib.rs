//! Shared configuration for Flowdeck.
//!
//! This crate provides the layered configuration loader used by every other
//! crate in the workspace. Configuration is read from optional `config/*`
//! files and `FLOWDECK`-prefixed environment variables.

pub mod config;

pub use config::{AppConfig, StorageSettings};
