//! Command dispatch for the raclient console.
//!
//! A [`RaClient`] owns the token record, the session variables and the
//! operator debug log. Console input is parsed into a [`Command`], checked
//! against the [`Operation`]'s parameter schema, and handed to its handler.

pub mod args;
pub mod client;
pub mod command;
pub mod console;
pub mod debug;
pub mod operation;
pub mod vars;

pub use args::{ArgValue, Args};
pub use client::RaClient;
pub use command::{Command, parse_line, parse_tokens};
pub use console::{Console, OUTPUT_PREFIX};
pub use debug::DebugSink;
pub use operation::{Operation, ParamKind, ParamSpec};
pub use vars::{DEFAULT_VARIABLES, SessionVars};
