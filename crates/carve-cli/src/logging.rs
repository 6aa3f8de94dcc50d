//! Logging setup for the binary

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used for the given verbosity
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Install the global subscriber; call once, from `main`
pub fn setup_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter(verbose))
        .init();
}

#[cfg(test)]
mod tests;
