//! Dispatch targets.
//!
//! A command's dispatch target receives the ordered call arguments rebuilt
//! by the router and returns a [`Value`]. Targets take `&mut self`, so plain
//! `FnMut` closures can keep state between invocations.
//!
//! - [`Handler`]: the trait every target implements
//! - [`FnHandler`]: wraps a closure that also wants the [`CommandContext`]
//! - [`SimpleFnHandler`]: wraps a closure that only wants the arguments
//! - [`IntoCommandResult`]: lets closures return any `Result<T, E>` where
//!   `T: Into<Value>`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::value::Value;

/// Context passed to dispatch targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandContext {
    /// Subcommand names from the root, e.g. `["sub", "powOfSub"]`.
    pub command_path: Vec<String>,
    /// Identity of the function being called.
    pub command: String,
    /// Group options collected along the command path, by destination.
    pub options: BTreeMap<String, Value>,
}

impl CommandContext {
    pub fn new(command_path: Vec<String>, command: impl Into<String>) -> Self {
        Self {
            command_path,
            command: command.into(),
            options: BTreeMap::new(),
        }
    }

    /// Value of a group option.
    pub fn option(&self, dest: &str) -> Option<&Value> {
        self.options.get(dest)
    }
}

/// The result type of dispatch targets.
pub type CommandResult = Result<Value, anyhow::Error>;

/// Conversion of a closure's return value into a [`CommandResult`].
///
/// ```rust
/// use mandate::{IntoCommandResult, Value};
///
/// let ok: Result<i64, anyhow::Error> = Ok(9);
/// assert_eq!(ok.into_command_result().unwrap(), Value::Int(9));
///
/// let unit: Result<(), std::io::Error> = Ok(());
/// assert_eq!(unit.into_command_result().unwrap(), Value::None);
/// ```
pub trait IntoCommandResult {
    fn into_command_result(self) -> CommandResult;
}

impl<T, E> IntoCommandResult for Result<T, E>
where
    T: Into<Value>,
    E: Into<anyhow::Error>,
{
    fn into_command_result(self) -> CommandResult {
        self.map(Into::into).map_err(Into::into)
    }
}

/// Trait for dispatch targets.
///
/// ```rust
/// use mandate::{CommandContext, CommandResult, Handler, Value};
///
/// struct Counter { calls: i64 }
///
/// impl Handler for Counter {
///     fn handle(&mut self, _args: Vec<Value>, _ctx: &CommandContext) -> CommandResult {
///         self.calls += 1;
///         Ok(Value::Int(self.calls))
///     }
/// }
/// ```
pub trait Handler {
    fn handle(&mut self, args: Vec<Value>, ctx: &CommandContext) -> CommandResult;
}

/// Shared, single-threaded handle on a dispatch target.
pub type SharedHandler = Rc<RefCell<dyn Handler>>;

/// Moves a handler behind a [`SharedHandler`].
pub fn share<H: Handler + 'static>(handler: H) -> SharedHandler {
    Rc::new(RefCell::new(handler))
}

/// Wraps an `FnMut(Vec<Value>, &CommandContext)` closure.
pub struct FnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: FnMut(Vec<Value>, &CommandContext) -> R,
    R: IntoCommandResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: FnMut(Vec<Value>, &CommandContext) -> R,
    R: IntoCommandResult,
{
    fn handle(&mut self, args: Vec<Value>, ctx: &CommandContext) -> CommandResult {
        (self.f)(args, ctx).into_command_result()
    }
}

impl<F, R> fmt::Debug for FnHandler<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Wraps an `FnMut(Vec<Value>)` closure that does not need the context.
pub struct SimpleFnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> SimpleFnHandler<F, R>
where
    F: FnMut(Vec<Value>) -> R,
    R: IntoCommandResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R> Handler for SimpleFnHandler<F, R>
where
    F: FnMut(Vec<Value>) -> R,
    R: IntoCommandResult,
{
    fn handle(&mut self, args: Vec<Value>, _ctx: &CommandContext) -> CommandResult {
        (self.f)(args).into_command_result()
    }
}

impl<F, R> fmt::Debug for SimpleFnHandler<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleFnHandler").finish_non_exhaustive()
    }
}
