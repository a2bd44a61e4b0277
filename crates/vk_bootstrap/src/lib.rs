//! # Vulkan Bootstrap
//!
//! Brings a Vulkan instance up behind a window and tears it down again in
//! strict reverse order.
//!
//! ## Features
//!
//! - **Capability Negotiation**: Enumerates instance layers and extensions
//!   and verifies the diagnostic ones before asking for them
//! - **Scoped Ownership**: Window, instance and debug messenger are guards
//!   that release themselves newest first
//! - **Diagnostic Channel**: Driver validation messages routed to the log
//!   or to a custom observer
//! - **Config Files**: Window, identity and diagnostics settings from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let backend = AshBackend::load()?;
//!     let mut controller = LifecycleController::new(
//!         config.lifecycle_config(),
//!         GlfwProvider::new(),
//!         backend,
//!     );
//!     controller.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

// Core configuration
pub mod core;

pub mod config;
pub mod foundation;
pub mod lifecycle;
pub mod render;

#[cfg(test)]
mod testing;

pub use lifecycle::{exit_status, LifecycleController, LifecycleError, LifecycleState, RunSummary};

/// Common imports for applications
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::{ApplicationConfig, DiagnosticsConfig, WindowConfig},
        exit_status,
        lifecycle::{LifecycleConfig, BUILD_DIAGNOSTICS_ENABLED},
        render::backends::vulkan::initialization::{
            ApplicationIdentity, DiagnosticMessage, MessageObserver, Severity, VersionTriple,
        },
        render::{AshBackend, GlfwProvider},
        LifecycleController, LifecycleError, LifecycleState, RunSummary,
    };
}
