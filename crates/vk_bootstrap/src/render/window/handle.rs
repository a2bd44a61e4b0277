//! Scoped ownership of the window system and its window
//!
//! [`WindowSystem`] terminates the provider when dropped and
//! [`WindowScope`] destroys its window when dropped. A scope mutably borrows
//! its system, so the window is always gone before the system terminates.

use crate::core::WindowConfig;
use crate::render::window::backend::{WindowProvider, WindowResult};

/// An initialized window system
pub struct WindowSystem<'p, P: WindowProvider> {
    provider: &'p mut P,
}

impl<'p, P: WindowProvider> WindowSystem<'p, P> {
    /// Initialize the provider
    ///
    /// Nothing is registered for teardown if initialization fails.
    pub fn init(provider: &'p mut P) -> WindowResult<Self> {
        provider.init()?;
        log::debug!("Window system initialized");
        Ok(Self { provider })
    }

    /// Create the application window
    pub fn create_window(&mut self, config: &WindowConfig) -> WindowResult<WindowScope<'_, P>> {
        let window = self.provider.create_window(config)?;
        log::info!(
            "Created window \"{}\" ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(WindowScope {
            provider: &mut *self.provider,
            window: Some(window),
        })
    }
}

impl<P: WindowProvider> Drop for WindowSystem<'_, P> {
    fn drop(&mut self) {
        self.provider.terminate();
        log::debug!("Window system terminated");
    }
}

/// A live window
pub struct WindowScope<'s, P: WindowProvider> {
    provider: &'s mut P,
    window: Option<P::Window>,
}

impl<P: WindowProvider> WindowScope<'_, P> {
    /// Instance extensions the window system needs
    pub fn required_extensions(&self) -> WindowResult<Vec<String>> {
        self.provider.required_extensions()
    }

    /// Whether a close was requested
    ///
    /// A destroyed window always reports `true`.
    pub fn should_close(&self) -> bool {
        self.window
            .as_ref()
            .map_or(true, |window| self.provider.should_close(window))
    }

    /// Process pending events
    pub fn poll_events(&mut self) {
        self.provider.poll_events();
    }
}

impl<P: WindowProvider> Drop for WindowScope<'_, P> {
    fn drop(&mut self) {
        if let Some(window) = self.window.take() {
            self.provider.destroy_window(window);
            log::debug!("Window destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, CallLog, MockWindowProvider};

    #[test]
    fn test_window_destroyed_before_terminate() {
        let log = CallLog::default();
        let mut provider = MockWindowProvider::new(log.clone());
        {
            let mut system = WindowSystem::init(&mut provider).unwrap();
            let window = system.create_window(&WindowConfig::default()).unwrap();
            assert!(!window.should_close());
        }

        assert_eq!(
            log.calls(),
            vec![
                Call::WindowInit,
                Call::CreateWindow {
                    width: 800,
                    height: 600,
                    title: "Vulkan".to_string(),
                    resizable: false,
                },
                Call::DestroyWindow,
                Call::Terminate,
            ]
        );
    }

    #[test]
    fn test_resizable_flag_reaches_provider() {
        let log = CallLog::default();
        let mut provider = MockWindowProvider::new(log.clone());
        {
            let mut system = WindowSystem::init(&mut provider).unwrap();
            let config = WindowConfig::new(640, 480, "Resizable").with_resizable(true);
            let _window = system.create_window(&config).unwrap();
        }

        assert_eq!(
            log.calls()[1],
            Call::CreateWindow {
                width: 640,
                height: 480,
                title: "Resizable".to_string(),
                resizable: true,
            }
        );
    }

    #[test]
    fn test_failed_init_registers_no_teardown() {
        let log = CallLog::default();
        let mut provider = MockWindowProvider::new(log.clone()).failing_init();
        assert!(WindowSystem::init(&mut provider).is_err());
        assert_eq!(log.calls(), vec![Call::WindowInit]);
    }

    #[test]
    fn test_failed_window_creation_still_terminates() {
        let log = CallLog::default();
        let mut provider = MockWindowProvider::new(log.clone()).failing_window();
        {
            let mut system = WindowSystem::init(&mut provider).unwrap();
            assert!(system.create_window(&WindowConfig::default()).is_err());
        }
        assert_eq!(log.calls().last(), Some(&Call::Terminate));
        assert!(!log.calls().contains(&Call::DestroyWindow));
    }
}
