//! Tests for logging setup
//!
//! The global subscriber can only be installed once per process, so these
//! exercise the filter selection and subscriber assembly without calling
//! `setup_logging` itself.

use tracing_subscriber::{fmt, prelude::*};

use crate::logging::env_filter;

#[test]
fn test_env_filter_default_is_info() {
    let debug_str = format!("{:?}", env_filter(false));
    assert!(debug_str.contains("INFO") || debug_str.contains("info"));
}

#[test]
fn test_env_filter_verbose_is_debug() {
    let debug_str = format!("{:?}", env_filter(true));
    assert!(debug_str.contains("DEBUG") || debug_str.contains("debug"));
}

#[test]
fn test_registry_with_fmt_layer_creation() {
    let _subscriber = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter(false));
}

#[test]
fn test_scoped_subscriber_accepts_events() {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(env_filter(true));

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("debug event");
        tracing::info!("info event");
    });
}
