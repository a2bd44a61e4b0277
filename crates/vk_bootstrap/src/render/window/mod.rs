//! Window management subsystem
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     LifecycleController         │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!   ┌───────────▼────────────┐
//!   │ WindowSystem / Scope   │ ← Scoped ownership (handle.rs)
//!   └───────────┬────────────┘
//!               │ Calls
//!      ┌────────▼────────┐
//!      │ WindowProvider  │ ← Trait (backend.rs)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwProvider          │ ← glfw.rs
//!   │ MockWindowProvider    │ ← tests
//!   └───────────────────────┘
//! ```

pub mod backend;
pub mod glfw;
pub mod handle;

pub use self::backend::{WindowError, WindowProvider, WindowResult};
pub use self::glfw::{GlfwProvider, GlfwWindow};
pub use self::handle::{WindowScope, WindowSystem};
