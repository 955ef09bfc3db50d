//! Panic reporting and boot diagnostics.

use log::{error, info};

/// Log the firmware identity once at boot.
pub fn banner() {
    info!(
        "{} v{} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}

/// Route panics through the logger before the default abort.
///
/// On device a bare panic only reaches the UART as an unwinding dump;
/// going through the log facade keeps the task name and location in the
/// same stream as everything else.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("<unnamed>");
        match info.location() {
            Some(loc) => error!("task '{name}' panicked at {loc}: {info}"),
            None => error!("task '{name}' panicked: {info}"),
        }
    }));
}
