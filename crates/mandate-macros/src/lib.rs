//! Proc macros for mandate.
//!
//! This crate provides the `#[command]` attribute, which describes a plain
//! function to `mandate` so it can be registered as a subcommand.
//!
//! Use it through the `mandate` crate, which re-exports it:
//!
//! ```rust,ignore
//! use mandate::{command, Program};
//!
//! /// Echo your text.
//! ///
//! /// :param text: The text to echo.
//! /// :param -c, --capitalize: Capitalize it.
//! #[command]
//! fn echo(text: String, capitalize: bool) -> String {
//!     if capitalize { text.to_uppercase() } else { text }
//! }
//!
//! let mut program = Program::new("echo");
//! program.command(echo__function())?;
//! ```

use proc_macro::TokenStream;

mod command;

/// Describes a function as a mandate command.
///
/// Generates `<fn>__function() -> mandate::Function` next to the untouched
/// function. The parameter list maps onto a signature:
///
/// | Rust parameter | Command line |
/// |----------------|--------------|
/// | `x: T` | required positional |
/// | `x: bool` | switch, default `false` |
/// | `x: Option<T>` | option, default none |
/// | `x: Vec<T>` | repeatable option, default empty |
/// | `#[default(expr)] x: T` | option with that default |
/// | `#[rest] x: Vec<T>` | trailing positionals |
/// | `#[ctx] ctx: &CommandContext` | not on the command line |
///
/// Integer, float and `String` types become the parameter's value type.
/// `#[arg("-y", "--epsilon", value_type = "int", metavar = "...", help = "...",
/// action = "append", dest = "...")]` records an explicit override; defaults
/// come from `#[default(expr)]`. `///` doc comments become the command's doc text.
///
/// Command attributes: `name = "..."` registers the command under another
/// name; `doc_style = "google" | "numpy" | "rest"` picks the doc dialect.
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::command_impl(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
