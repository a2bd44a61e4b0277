//! Vulkan backend implementation
//!
//! Organized into the backend contract, the loader-backed implementation and
//! the initialization steps that run on top of it.

/// Graphics backend contract and driver-facing data
pub mod backend;

/// Backend over the system Vulkan loader
pub mod entry;

/// Vulkan initialization types (catalog, verifier, context, diagnostics)
pub mod initialization;

pub use backend::{
    BackendError, BackendResult, ContextHandle, CreationParams, ExtensionDescriptor,
    GraphicsBackend, LayerDescriptor,
};
pub use entry::AshBackend;
