//! Foundation module - Core utilities and types
//!
//! - Logging utilities

pub mod logging;
