//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still wins when it is set. Calling this twice keeps the first
/// logger.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("warning: logger already initialized: {}", e);
    }
}
