//! # Application Configuration
//!
//! Everything the bring-up sequence can be told from outside the binary:
//! window geometry, the identity reported to the driver, diagnostic
//! verbosity and the log level.
//!
//! Whether diagnostics are enabled at all is NOT configurable here. That is
//! fixed by the build profile and added when converting to a
//! [`LifecycleConfig`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{Config, ConfigError};
use crate::lifecycle::{LifecycleConfig, BUILD_DIAGNOSTICS_ENABLED};
use crate::render::backends::vulkan::initialization::context::{ApplicationIdentity, VersionTriple};

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Title bar text
    pub title: String,
    /// Whether the user may resize the window
    pub resizable: bool,
}

impl WindowConfig {
    /// Create a window configuration
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            resizable: false,
        }
    }

    /// Allow or forbid resizing
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(800, 600, "Vulkan")
    }
}

/// # Diagnostics Configuration
///
/// Only consulted when the build has diagnostics enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Also forward informational and verbose driver messages
    pub verbose: bool,
}

impl DiagnosticsConfig {
    /// Forward everything the driver emits
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration loaded by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Window settings
    pub window: WindowConfig,
    /// Identity handed to the driver on context creation
    pub identity: ApplicationIdentity,
    /// Diagnostic channel settings
    pub diagnostics: DiagnosticsConfig,
}

impl ApplicationConfig {
    /// Create a configuration for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            identity: ApplicationIdentity::new(app_name),
            ..Self::default()
        }
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the window configuration
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set the application version
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.identity.version = VersionTriple::new(major, minor, patch);
        self
    }

    /// Set the diagnostics configuration
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| ConfigError::Invalid(format!("Unknown log level: {}", self.log_level)))?;
        self.window.validate().map_err(ConfigError::Invalid)?;
        self.identity.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Load from `path` (defaults when absent) and validate
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Runtime configuration for the lifecycle controller
    ///
    /// Adds the build-time diagnostics switch.
    pub fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig {
            window: self.window.clone(),
            identity: self.identity.clone(),
            diagnostics_enabled: BUILD_DIAGNOSTICS_ENABLED,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            identity: ApplicationIdentity::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Config for ApplicationConfig {}
