//! Window provider backed by GLFW
//!
//! Windows are created without a client API so Vulkan can own the surface.

use crate::core::WindowConfig;
use crate::render::window::backend::{WindowError, WindowProvider, WindowResult};

/// GLFW window plus its event receiver
pub struct GlfwWindow {
    window: glfw::PWindow,
    _events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

/// GLFW windowing system
pub struct GlfwProvider {
    glfw: Option<glfw::Glfw>,
}

impl GlfwProvider {
    /// Create an uninitialized provider
    pub fn new() -> Self {
        Self { glfw: None }
    }

    fn glfw(&self) -> WindowResult<&glfw::Glfw> {
        self.glfw.as_ref().ok_or(WindowError::NotInitialized)
    }
}

impl Default for GlfwProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowProvider for GlfwProvider {
    type Window = GlfwWindow;

    fn init(&mut self) -> WindowResult<()> {
        let mut glfw = glfw::init(glfw::log_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));

        self.glfw = Some(glfw);
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<Self::Window> {
        let glfw = self.glfw.as_mut().ok_or(WindowError::NotInitialized)?;
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::CreationFailed {
                title: config.title.clone(),
            })?;

        window.set_close_polling(true);

        Ok(GlfwWindow {
            window,
            _events: events,
        })
    }

    fn required_extensions(&self) -> WindowResult<Vec<String>> {
        let glfw = self.glfw()?;
        if !glfw.vulkan_supported() {
            return Err(WindowError::ExtensionsUnavailable);
        }
        glfw.get_required_instance_extensions()
            .ok_or(WindowError::ExtensionsUnavailable)
    }

    fn should_close(&self, window: &Self::Window) -> bool {
        window.window.should_close()
    }

    fn poll_events(&mut self) {
        if let Some(glfw) = self.glfw.as_mut() {
            glfw.poll_events();
        }
    }

    fn destroy_window(&mut self, window: Self::Window) {
        drop(window);
    }

    fn terminate(&mut self) {
        // Dropping the last handle terminates GLFW
        self.glfw.take();
    }
}
