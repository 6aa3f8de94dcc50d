//! carve-cli library
//!
//! Exposes the command layer of the `carve` binary so it can be driven from
//! integration tests.

#[doc(hidden)]
pub mod commands;

pub mod logging;

pub use commands::{Cli, Commands, ExtractArgs};
