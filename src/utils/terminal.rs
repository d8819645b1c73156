//! Terminal output utilities

use console::style;
use tracing_subscriber::EnvFilter;

use crate::error::DevError;

/// Print a top-level error, its cause chain, and any hint to stderr
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", style("ERROR:").red().bold(), err);

    if let Some(hint) = err.downcast_ref::<DevError>().and_then(DevError::hint) {
        eprintln!("{} {}", style("HINT:").yellow().bold(), hint);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", style("success:").green().bold(), message);
}

/// Default log filter; `debug` turns on dev's own debug logging
pub fn log_filter(debug: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    if debug {
        EnvFilter::new("info,dev=debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Install the stderr log subscriber
pub fn init_logging(debug: bool, ansi: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .init();
}
