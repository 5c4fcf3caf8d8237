//! Checkmate CLI library.
//!
//! Command-line front end for the fact-check pipeline: one-shot checks,
//! record lookup, and an interactive menu with a free-form chat mode.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod repl;

pub use app::{open_store, App, Checker};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
