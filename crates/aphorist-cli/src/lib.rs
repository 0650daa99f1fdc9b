//! Aphorist CLI library.
//!
//! Configuration, command execution and output formatting for the
//! `aphorist` binary. Corpus commands work offline; `analyze` and the REPL
//! talk to the configured inference endpoint.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
