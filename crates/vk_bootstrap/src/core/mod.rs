//! # Core Module
//!
//! Configuration shared by the binary and the lifecycle controller.

pub mod config;

pub use config::{ApplicationConfig, DiagnosticsConfig, WindowConfig};

// Re-export the file loading trait alongside the types that implement it
pub use crate::config::{Config, ConfigError};
