//! Vulkan context creation
//!
//! Builds the single creation request from the application identity and
//! the resolved feature request, and owns the resulting instance.

use ash::vk;
use serde::{Deserialize, Serialize};
use std::ffi::CString;

use crate::render::backends::vulkan::backend::{
    BackendError, BackendResult, ContextHandle, CreationParams, GraphicsBackend,
};
use crate::render::backends::vulkan::initialization::requirements::FeatureRequest;

/// Major, minor and patch version numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTriple {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl VersionTriple {
    /// Create a version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Packed form used by the driver
    pub fn packed(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl Default for VersionTriple {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Who is asking for the context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationIdentity {
    /// Application name
    pub name: String,
    /// Application version
    pub version: VersionTriple,
    /// Engine name
    pub engine_name: String,
    /// Engine version
    pub engine_version: VersionTriple,
    /// API version the application is written against
    pub api_version: VersionTriple,
}

impl ApplicationIdentity {
    /// Identity for the named application with default versions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate the identity
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Application name cannot be empty".to_string());
        }
        if self.name.contains('\0') || self.engine_name.contains('\0') {
            return Err("Application and engine names cannot contain NUL".to_string());
        }
        Ok(())
    }
}

impl Default for ApplicationIdentity {
    fn default() -> Self {
        Self {
            name: "Hello Triangle".to_string(),
            version: VersionTriple::default(),
            engine_name: "No engine".to_string(),
            engine_version: VersionTriple::default(),
            api_version: VersionTriple::new(1, 0, 0),
        }
    }
}

fn driver_string(name: &str) -> BackendResult<CString> {
    CString::new(name).map_err(|_| BackendError::InvalidName(name.to_string()))
}

impl CreationParams {
    /// Assemble the creation request
    ///
    /// Layers are requested only when diagnostics were approved; extensions
    /// are the window system's plus the approved diagnostic ones.
    pub fn new(
        identity: &ApplicationIdentity,
        request: &FeatureRequest,
        diagnostics_approved: bool,
    ) -> BackendResult<Self> {
        Ok(Self {
            application_name: driver_string(&identity.name)?,
            application_version: identity.version.packed(),
            engine_name: driver_string(&identity.engine_name)?,
            engine_version: identity.engine_version.packed(),
            api_version: identity.api_version.packed(),
            enabled_layers: request
                .enabled_layers(diagnostics_approved)
                .into_iter()
                .map(driver_string)
                .collect::<BackendResult<_>>()?,
            enabled_extensions: request
                .enabled_extensions(diagnostics_approved)
                .into_iter()
                .map(driver_string)
                .collect::<BackendResult<_>>()?,
        })
    }
}

/// The live root context
///
/// Destroys the context when dropped. Child objects borrow it, so they are
/// always gone first.
pub struct GraphicsContext<'b, B: GraphicsBackend> {
    backend: &'b B,
    context: B::Context,
    enabled_layers: Vec<String>,
    enabled_extensions: Vec<String>,
}

impl<'b, B: GraphicsBackend> GraphicsContext<'b, B> {
    /// Create the context
    ///
    /// Calls the backend's create entry point exactly once.
    pub fn create(
        backend: &'b B,
        identity: &ApplicationIdentity,
        request: &FeatureRequest,
        diagnostics_approved: bool,
    ) -> BackendResult<Self> {
        let params = CreationParams::new(identity, request, diagnostics_approved)?;
        log::debug!(
            "Creating Vulkan instance for \"{}\" with layers {:?} and extensions {:?}",
            identity.name,
            params.layer_names(),
            params.extension_names()
        );

        let context = backend
            .create_context(&params)
            .map_err(|status| BackendError::Rejected {
                operation: "vkCreateInstance",
                status,
            })?;

        log::info!("Vulkan instance created.");

        Ok(Self {
            backend,
            context,
            enabled_layers: params.layer_names(),
            enabled_extensions: params.extension_names(),
        })
    }

    /// The backend that created this context
    pub fn backend(&self) -> &'b B {
        self.backend
    }

    /// The backend's context object
    pub fn context(&self) -> &B::Context {
        &self.context
    }

    /// Raw instance handle
    pub fn raw_handle(&self) -> vk::Instance {
        self.context.raw_handle()
    }

    /// Layers the context was created with
    pub fn enabled_layers(&self) -> &[String] {
        &self.enabled_layers
    }

    /// Extensions the context was created with
    pub fn enabled_extensions(&self) -> &[String] {
        &self.enabled_extensions
    }
}

impl<B: GraphicsBackend> Drop for GraphicsContext<'_, B> {
    fn drop(&mut self) {
        self.backend.destroy_context(&self.context);
        log::debug!("Vulkan instance destroyed");
    }
}
