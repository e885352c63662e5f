//! An interactive shell with tab completion and output redirection.
//!
//! A command line goes through three stages. The [`lexer`] splits it into words
//! following POSIX-style quoting, [`parser`] pulls the `>`, `>>`, `2>` and `2>>`
//! operators out of the word list, and [`Interpreter`] dispatches the remaining
//! argv to a builtin or to an external program found on `PATH`.
//!
//! The interactive front end lives in [`editor`]: a raw-mode line reader that asks
//! a [`completion::Completer`] for candidates when TAB is pressed.

mod builtin;
pub mod command;
pub mod completion;
pub mod config;
pub mod editor;
pub mod env;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod terminal;

pub use config::{Config, ShellArgs};
pub use env::Environment;
/// Just a convenient re-export of the command line runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
