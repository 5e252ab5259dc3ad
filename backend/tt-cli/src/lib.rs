//! tt-cli library
//!
//! Argument parsing and command dispatch for the `tt` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod runner;
pub mod ticket_commands;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use error::{CliError, Result};
pub use runner::{Session, execute};
