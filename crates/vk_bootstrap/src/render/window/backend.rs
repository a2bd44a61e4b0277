//! Window provider contract
//!
//! The lifecycle controller talks to the windowing system only through this
//! trait. The GLFW implementation lives in `glfw.rs`; tests substitute a
//! recording mock.

use thiserror::Error;

use crate::core::WindowConfig;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing system refused to start
    #[error("Window system initialization failed: {0}")]
    InitializationFailed(String),

    /// A window operation was attempted before `init` or after `terminate`
    #[error("Window system is not initialized")]
    NotInitialized,

    /// The windowing system could not create the window
    #[error("Window creation failed: {title}")]
    CreationFailed {
        /// Title of the window that was requested
        title: String,
    },

    /// The windowing system cannot report the instance extensions it needs
    #[error("Window system cannot provide required Vulkan extensions")]
    ExtensionsUnavailable,
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Windowing system used to host the graphics context
///
/// # Thread Safety
/// Not `Send`. Window operations happen on the thread that called `init`.
pub trait WindowProvider {
    /// Native window type
    type Window;

    /// Start the windowing system
    fn init(&mut self) -> WindowResult<()>;

    /// Create a window with the configured client area, title and resizability
    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<Self::Window>;

    /// Instance extensions the windowing system needs to present to its windows
    ///
    /// These are trusted to exist: the windowing system has already asked the
    /// driver for them.
    fn required_extensions(&self) -> WindowResult<Vec<String>>;

    /// Whether the user has asked for the window to close
    fn should_close(&self, window: &Self::Window) -> bool;

    /// Process pending window system events
    fn poll_events(&mut self);

    /// Destroy a window
    fn destroy_window(&mut self, window: Self::Window);

    /// Shut the windowing system down
    fn terminate(&mut self);
}
