//! # Rendering System Bring-Up
//!
//! Everything needed before the first draw call:
//! - **Window**: the window provider and scoped window ownership
//! - **Vulkan Backend**: capability negotiation, context creation and the
//!   diagnostic channel
//!
//! Rendering itself (swapchains, pipelines, command recording) is not part
//! of this crate.

// Public modules for application use
pub mod window;

/// Graphics backend implementations
///
/// Currently supports Vulkan through `ash`.
pub mod backends;

pub use backends::vulkan::{AshBackend, BackendError, GraphicsBackend};
pub use window::{GlfwProvider, WindowError, WindowProvider};
