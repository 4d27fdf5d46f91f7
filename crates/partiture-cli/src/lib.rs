//! Partiture CLI Library
//!
//! Argument definitions, command implementations and terminal plumbing for the
//! `partiture` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command, InputArgs};
pub use commands::run;
pub use error::{error_json, render_error};
pub use logging::init_tracing;
