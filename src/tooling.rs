//! Tooling & Integration Layer
//!
//! The command-line front-end: argument parsing, session handling, caller-side
//! validation and output formatting around the item repository.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
