//! Gleaner CLI library.
//!
//! Session state, configuration, command execution and output formatting
//! for the `gleaner` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod schema_file;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::{SendBlocker, Session};
