//! Lifecycle controller
//!
//! Owns every handle and runs the bring-up, idle loop and teardown in
//! order:
//!
//! ```text
//! window → context → diagnostic channel → (idle) → channel → context → window
//! ```
//!
//! Each acquisition is a scope guard on the stack of [`LifecycleController::run`],
//! so an early `?` releases exactly what was acquired, newest first.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{DiagnosticsConfig, WindowConfig};
use crate::render::backends::vulkan::backend::{BackendError, GraphicsBackend};
use crate::render::backends::vulkan::initialization::{
    build_request, verify, ApplicationIdentity, CapabilityCatalog, DiagnosticChannel,
    DiagnosticError, GraphicsContext, LogObserver, MessageObserver, UnsupportedFeature,
};
use crate::render::window::{WindowError, WindowProvider, WindowSystem};

/// Whether this build requests validation layers and the debug messenger
pub const BUILD_DIAGNOSTICS_ENABLED: bool = cfg!(debug_assertions);

/// Lifecycle errors
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Window system failure
    #[error(transparent)]
    Window(#[from] WindowError),

    /// A requested diagnostic feature is missing
    #[error(transparent)]
    UnsupportedFeature(#[from] UnsupportedFeature),

    /// The driver rejected a creation call
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The diagnostic channel failed for a reason other than absence
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The controller has already run
    #[error("Lifecycle controller has already terminated")]
    AlreadyTerminated,
}

/// Process exit status for a lifecycle result
pub fn exit_status<T>(result: &Result<T, LifecycleError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Runtime configuration for one lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Window to create
    pub window: WindowConfig,
    /// Identity handed to the driver
    pub identity: ApplicationIdentity,
    /// Request validation layers and attach a diagnostic channel
    pub diagnostics_enabled: bool,
    /// Diagnostic channel settings
    pub diagnostics: DiagnosticsConfig,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            identity: ApplicationIdentity::default(),
            diagnostics_enabled: BUILD_DIAGNOSTICS_ENABLED,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing acquired yet
    Uninitialized,
    /// Window created
    WindowReady,
    /// Context created
    BackendReady,
    /// Diagnostic channel attached
    DiagnosticsReady,
    /// Idle loop running
    Running,
    /// Releasing handles
    ShuttingDown,
    /// Everything released; absorbing
    Terminated,
}

impl LifecycleState {
    /// Whether `next` is a legal transition from this state
    pub fn can_advance_to(self, next: Self) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, WindowReady)
                | (WindowReady, BackendReady)
                | (BackendReady, DiagnosticsReady)
                | (BackendReady, Running)
                | (DiagnosticsReady, Running)
                | (Uninitialized | WindowReady | BackendReady | DiagnosticsReady | Running, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }
}

/// Current state plus every state visited
#[derive(Debug, Clone)]
struct StateMachine {
    history: Vec<LifecycleState>,
}

impl StateMachine {
    fn new() -> Self {
        Self {
            history: vec![LifecycleState::Uninitialized],
        }
    }

    fn current(&self) -> LifecycleState {
        self.history
            .last()
            .copied()
            .unwrap_or(LifecycleState::Uninitialized)
    }

    fn advance(&mut self, next: LifecycleState) {
        let current = self.current();
        debug_assert!(
            current.can_advance_to(next),
            "illegal lifecycle transition {:?} -> {:?}",
            current,
            next
        );
        log::debug!("Lifecycle: {:?} -> {:?}", current, next);
        self.history.push(next);
    }

    /// Mark the start of unwinding and convert the error that caused it
    fn fail(&mut self, error: impl Into<LifecycleError>) -> LifecycleError {
        self.advance(LifecycleState::ShuttingDown);
        error.into()
    }
}

/// What a completed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Idle loop iterations before the close request was seen
    pub iterations: u64,
    /// Whether a diagnostic channel was live during the loop
    pub diagnostics_attached: bool,
}

/// Single-use owner of the window, the context and the diagnostic channel
pub struct LifecycleController<P: WindowProvider, B: GraphicsBackend> {
    config: LifecycleConfig,
    provider: P,
    backend: B,
    observer: Option<Box<dyn MessageObserver>>,
    machine: StateMachine,
}

impl<P: WindowProvider, B: GraphicsBackend> LifecycleController<P, B> {
    /// Create a controller; nothing is acquired until [`run`](Self::run)
    pub fn new(config: LifecycleConfig, provider: P, backend: B) -> Self {
        Self {
            config,
            provider,
            backend,
            observer: None,
            machine: StateMachine::new(),
        }
    }

    /// Send driver messages to `observer` instead of the log
    pub fn with_observer(mut self, observer: Box<dyn MessageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.machine.current()
    }

    /// Every state visited so far, oldest first
    pub fn history(&self) -> &[LifecycleState] {
        &self.machine.history
    }

    /// Run the whole lifecycle
    ///
    /// Returns once the window asks to close and everything is released, or
    /// after unwinding a failed bring-up. The controller is then
    /// [`Terminated`](LifecycleState::Terminated); calling `run` again
    /// returns [`LifecycleError::AlreadyTerminated`].
    pub fn run(&mut self) -> Result<RunSummary, LifecycleError> {
        if self.state() != LifecycleState::Uninitialized {
            return Err(LifecycleError::AlreadyTerminated);
        }

        let observer = self
            .observer
            .take()
            .unwrap_or_else(|| Box::new(LogObserver));
        let result = bring_up_and_run(
            &self.config,
            &mut self.provider,
            &self.backend,
            observer,
            &mut self.machine,
        );

        self.machine.advance(LifecycleState::Terminated);
        match &result {
            Ok(summary) => log::info!("Cleanup done! ({} loop iterations)", summary.iterations),
            Err(e) => log::error!("Lifecycle failed: {}", e),
        }
        result
    }
}

fn bring_up_and_run<P: WindowProvider, B: GraphicsBackend>(
    config: &LifecycleConfig,
    provider: &mut P,
    backend: &B,
    observer: Box<dyn MessageObserver>,
    machine: &mut StateMachine,
) -> Result<RunSummary, LifecycleError> {
    let mut window_system = WindowSystem::init(provider).map_err(|e| machine.fail(e))?;
    let mut window = window_system
        .create_window(&config.window)
        .map_err(|e| machine.fail(e))?;
    machine.advance(LifecycleState::WindowReady);

    let required = window.required_extensions().map_err(|e| machine.fail(e))?;
    let request = build_request(&required, config.diagnostics_enabled);

    let catalog = CapabilityCatalog::new(backend);
    let layers = catalog.discover_layers();
    let extensions = catalog.discover_extensions();
    verify(&request.optional_layers, &layers).map_err(|e| machine.fail(e))?;
    verify(&request.optional_extensions, &extensions).map_err(|e| machine.fail(e))?;

    // Verification failures are fatal, so reaching here approves diagnostics
    let diagnostics_approved = config.diagnostics_enabled;
    let context = GraphicsContext::create(backend, &config.identity, &request, diagnostics_approved)
        .map_err(|e| machine.fail(e))?;
    machine.advance(LifecycleState::BackendReady);

    let channel = if diagnostics_approved {
        match DiagnosticChannel::attach(&context, observer, &config.diagnostics) {
            Ok(channel) => {
                machine.advance(LifecycleState::DiagnosticsReady);
                Some(channel)
            }
            Err(DiagnosticError::ExtensionNotPresent { entry_point }) => {
                log::warn!("{} unavailable, running without diagnostics", entry_point);
                None
            }
            Err(e) => return Err(machine.fail(e)),
        }
    } else {
        None
    };

    machine.advance(LifecycleState::Running);
    let mut iterations = 0;
    while !window.should_close() {
        window.poll_events();
        iterations += 1;
    }

    machine.advance(LifecycleState::ShuttingDown);
    log::info!("Shutting down.");
    let diagnostics_attached = channel.is_some();

    drop(channel);
    drop(context);
    drop(window);
    drop(window_system);

    Ok(RunSummary {
        iterations,
        diagnostics_attached,
    })
}
