//! Graphics backend contract
//!
//! The bring-up sequence reaches the driver only through [`GraphicsBackend`].
//! [`AshBackend`](super::entry::AshBackend) implements it over the Vulkan
//! loader; tests substitute a recording mock.

use ash::vk;
use std::ffi::{c_char, CStr, CString};
use thiserror::Error;

use crate::render::backends::vulkan::initialization::verifier::MAX_FEATURE_NAME_LEN;

/// Backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// The Vulkan loader could not be found or opened
    #[error("Failed to load Vulkan: {0}")]
    LoaderUnavailable(String),

    /// A name handed to the driver contains an interior NUL byte
    #[error("Invalid name for the driver: {0:?}")]
    InvalidName(String),

    /// The driver rejected a call
    #[error("{operation} failed: {status:?} ({})", .status.as_raw())]
    Rejected {
        /// Entry point that failed
        operation: &'static str,
        /// Raw status returned by the driver
        status: vk::Result,
    },
}

impl BackendError {
    /// Raw driver status, when the driver produced one
    pub fn status(&self) -> Option<vk::Result> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Read a driver-provided feature name
///
/// Stops at the first NUL or after [`MAX_FEATURE_NAME_LEN`] bytes, whichever
/// comes first, so an unterminated array never reads past the bound.
pub fn feature_name_from_raw(raw: &[c_char]) -> String {
    text_from_raw(raw, MAX_FEATURE_NAME_LEN)
}

#[allow(clippy::cast_sign_loss)]
fn text_from_raw(raw: &[c_char], limit: usize) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take(limit)
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// An instance layer the driver exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    /// Layer name
    pub name: String,
    /// Vulkan version the layer was written against
    pub spec_version: u32,
    /// Layer's own version
    pub implementation_version: u32,
    /// Human-readable description
    pub description: String,
}

impl LayerDescriptor {
    /// Descriptor with only a name, as used by tests and logs
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_version: 0,
            implementation_version: 0,
            description: String::new(),
        }
    }
}

impl From<&vk::LayerProperties> for LayerDescriptor {
    fn from(properties: &vk::LayerProperties) -> Self {
        Self {
            name: feature_name_from_raw(&properties.layer_name),
            spec_version: properties.spec_version,
            implementation_version: properties.implementation_version,
            description: text_from_raw(&properties.description, properties.description.len()),
        }
    }
}

/// An instance extension the driver exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Extension name
    pub name: String,
    /// Extension revision
    pub spec_version: u32,
}

impl ExtensionDescriptor {
    /// Descriptor with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_version: 0,
        }
    }
}

impl From<&vk::ExtensionProperties> for ExtensionDescriptor {
    fn from(properties: &vk::ExtensionProperties) -> Self {
        Self {
            name: feature_name_from_raw(&properties.extension_name),
            spec_version: properties.spec_version,
        }
    }
}

/// Everything the driver needs to create a context, in driver-ready form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationParams {
    /// Application name
    pub application_name: CString,
    /// Packed application version
    pub application_version: u32,
    /// Engine name
    pub engine_name: CString,
    /// Packed engine version
    pub engine_version: u32,
    /// Packed API version the application targets
    pub api_version: u32,
    /// Layers to enable, in order
    pub enabled_layers: Vec<CString>,
    /// Extensions to enable, in order
    pub enabled_extensions: Vec<CString>,
}

impl CreationParams {
    /// Enabled layer names as text
    pub fn layer_names(&self) -> Vec<String> {
        self.enabled_layers
            .iter()
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    /// Enabled extension names as text
    pub fn extension_names(&self) -> Vec<String> {
        self.enabled_extensions
            .iter()
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

/// A created context as seen by code that only needs its raw handle
pub trait ContextHandle {
    /// Raw instance handle
    fn raw_handle(&self) -> vk::Instance;
}

impl ContextHandle for ash::Instance {
    fn raw_handle(&self) -> vk::Instance {
        self.handle()
    }
}

/// Driver entry points used during bring-up
pub trait GraphicsBackend {
    /// Root context type
    type Context: ContextHandle;

    /// Every instance layer the driver exposes
    ///
    /// Defined never to fail; an unavailable catalog is empty.
    fn enumerate_layer_properties(&self) -> Vec<LayerDescriptor>;

    /// Every instance extension the driver exposes
    ///
    /// Defined never to fail; an unavailable catalog is empty.
    fn enumerate_extension_properties(&self) -> Vec<ExtensionDescriptor>;

    /// Create the root context
    ///
    /// All or nothing: on error no context exists.
    fn create_context(&self, params: &CreationParams) -> Result<Self::Context, vk::Result>;

    /// Destroy the root context
    ///
    /// The caller guarantees this happens exactly once, after every child
    /// object is destroyed, and that `context` is not used afterwards.
    fn destroy_context(&self, context: &Self::Context);

    /// Look up an entry point that is not part of the core API
    ///
    /// `None` when the driver does not provide it for this context.
    fn resolve_entry_point(&self, context: &Self::Context, name: &CStr) -> vk::PFN_vkVoidFunction;
}
