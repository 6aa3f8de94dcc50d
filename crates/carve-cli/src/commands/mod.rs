//! CLI commands

pub mod extract;
pub mod types;

pub use types::{Cli, Commands, ExtractArgs};
