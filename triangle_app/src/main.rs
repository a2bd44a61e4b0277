//! Hello triangle bring-up
//!
//! Opens a window, creates a Vulkan instance (with validation in debug
//! builds), idles until the window is closed and releases everything.

use std::process::ExitCode;

use vk_bootstrap::foundation::logging;
use vk_bootstrap::prelude::*;

const CONFIG_PATH: &str = "hello_triangle.toml";

fn run() -> Result<RunSummary, LifecycleError> {
    let config = ApplicationConfig::load_validated(CONFIG_PATH)?;

    logging::init_with_level(&config.log_level);
    log::info!(
        "Starting {} (diagnostics {})",
        config.identity.name,
        if BUILD_DIAGNOSTICS_ENABLED { "on" } else { "off" }
    );

    let backend = AshBackend::load()?;
    let mut controller = LifecycleController::new(config.lifecycle_config(), GlfwProvider::new(), backend);
    controller.run()
}

fn main() -> ExitCode {
    let result = run();
    if let Err(e) = &result {
        eprintln!("{}", e);
    }
    ExitCode::from(exit_status(&result))
}
