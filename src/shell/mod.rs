//! Interactive command shell.
//!
//! Parses commands, runs them against the current server connection, and
//! owns the REPL loop. All user-visible output (command results, errors,
//! and listener lines) goes through one ordered line channel drained by a
//! printer task, so listener output never tears the prompt.

mod command;
mod repl;
mod state;
mod stats;

pub use command::{dispatch, parse, Command, Flow};
pub use repl::run;
pub use state::{ActiveServer, ShellState};
