//! Turn plain functions into command-line subcommands.
//!
//! `mandate` builds a clap-based command line from the parameter lists and
//! doc comments of ordinary functions. A parameter without a default becomes
//! a positional argument; one with a default becomes a flag whose behaviour
//! follows from the default (a `false` default makes a switch, a list default
//! accumulates, a number default coerces). Doc comments supply help text,
//! flag aliases and types.
//!
//! # Sources of argument metadata
//!
//! Four sources are reconciled into one [`ParameterDescriptor`] per
//! parameter, strongest first:
//!
//! - explicit overrides ([`Function::arg`], `#[arg(...)]`)
//! - doc comment directives (`:param -s, --spam <int>: help`)
//! - declared types ([`Signature::annotate`], Rust types under `#[command]`)
//! - inference from the default value ([`infer`])
//!
//! # Example
//!
//! ```rust
//! use mandate::{command, Program, Value};
//!
//! /// Compute base ^ exp.
//! ///
//! /// :param int base: The base.
//! /// :param int exp: The exponent.
//! #[command]
//! fn pow(base: i64, exp: u32) -> anyhow::Result<i64> {
//!     Ok(base.pow(exp))
//! }
//!
//! let mut program = Program::new("pow");
//! program.command(pow__function()).unwrap();
//!
//! let done = program.try_execute(["pow", "2", "10"]).unwrap();
//! assert_eq!(done.output, Value::Int(1024));
//! ```
//!
//! # Doc dialects
//!
//! REST field lists are read natively. Google (`Args:`) and NumPy
//! (`Parameters` + dashes) sections are normalised first; pick the dialect
//! per function with [`Function::doc_style`] or for a whole program with
//! [`Program::doc_style`].
//!
//! # Logging
//!
//! Registration and dispatch emit `tracing` events at `debug` and `trace`
//! level. The library never installs a subscriber.

extern crate self as mandate;

pub mod alias;
pub mod docs;
mod engine;
mod error;
mod function;
mod handler;
mod infer;
mod overrides;
mod program;
mod registry;
mod resolve;
mod signature;
pub mod value;

pub use alias::ensure_dashes;
pub use docs::{find_param_docs, DocParam};
pub use error::{Error, SetupError};
pub use function::Function;
pub use handler::{
    share, CommandContext, CommandResult, FnHandler, Handler, IntoCommandResult, SharedHandler,
    SimpleFnHandler,
};
pub use infer::{infer, Inference};
pub use overrides::{ArgOptions, OverrideEntry, Overrides};
pub use program::{Execution, Invocation, Program};
pub use registry::{CommandSpec, Node, Registry};
pub use resolve::{resolve, Action, ParameterDescriptor};
pub use signature::{ParamKind, Parameter, Signature};
pub use value::{FromValue, Value, ValueError, ValueType};

pub use mandate_docstring::DocStyle;
pub use mandate_macros::command;
