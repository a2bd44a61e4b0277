//! Backend implementations for the render module
//!
//! Currently only Vulkan is supported.

/// Vulkan backend implementation
pub mod vulkan;
