//! The registration unit.
//!
//! A [`Function`] bundles everything the resolver needs to know about one
//! callable: its identity, doc comment, parameter list, pending overrides and
//! the dispatch target itself. `#[command]` produces one per annotated
//! function; it can also be assembled by hand:
//!
//! ```rust
//! use mandate::{ArgOptions, Function, Signature, Value, ValueType};
//!
//! let function = Function::new("overriding", |args: Vec<Value>| {
//!     let x = args[0].as_int().unwrap_or_default();
//!     let y = args[1].as_int().unwrap_or_default();
//!     Ok::<_, anyhow::Error>(x - y)
//! })
//! .doc("Yoo an override test.\n\n:param x <str>: Overridden.\n:param -y <metavar>: This too!!")
//! .signature(Signature::new().positional("x").optional("y", 4))
//! .arg("x", Vec::<String>::new(), ArgOptions::new().value_type(ValueType::Integer))
//! .arg("y", Vec::<String>::new(), ArgOptions::new().value_type(ValueType::Integer));
//!
//! assert_eq!(function.identity(), "overriding");
//! ```

use std::fmt;

use mandate_docstring::DocStyle;

use crate::handler::{
    share, CommandContext, FnHandler, Handler, IntoCommandResult, SharedHandler, SimpleFnHandler,
};
use crate::overrides::{ArgOptions, Overrides};
use crate::signature::Signature;
use crate::value::Value;

/// A callable plus the metadata commands are built from.
#[derive(Clone)]
pub struct Function {
    identity: String,
    name: Option<String>,
    doc: String,
    doc_style: Option<DocStyle>,
    signature: Signature,
    overrides: Overrides,
    handler: SharedHandler,
}

impl Function {
    /// Wraps a closure taking the ordered call arguments.
    pub fn new<F, R>(identity: impl Into<String>, f: F) -> Self
    where
        F: FnMut(Vec<Value>) -> R + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::from_handler(identity, SimpleFnHandler::new(f))
    }

    /// Wraps a closure that also receives the [`CommandContext`].
    pub fn with_context<F, R>(identity: impl Into<String>, f: F) -> Self
    where
        F: FnMut(Vec<Value>, &CommandContext) -> R + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::from_handler(identity, FnHandler::new(f))
    }

    /// Wraps any [`Handler`].
    pub fn from_handler<H: Handler + 'static>(identity: impl Into<String>, handler: H) -> Self {
        Self {
            identity: identity.into(),
            name: None,
            doc: String::new(),
            doc_style: None,
            signature: Signature::new(),
            overrides: Overrides::new(),
            handler: share(handler),
        }
    }

    /// Registers the command under `name` instead of its identity.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Dialect of the doc text. Unset means the program's default.
    pub fn doc_style(mut self, style: DocStyle) -> Self {
        self.doc_style = Some(style);
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Records an override for one parameter.
    ///
    /// `aliases` replaces the documented aliases when non-empty. Recording a
    /// second override for the same parameter replaces the first.
    pub fn arg<I, S>(mut self, param: impl Into<String>, aliases: I, options: ArgOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.insert(param, aliases, options);
        self
    }

    /// The function's own name, reported as the executed command.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Name the command is registered under.
    pub fn command_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identity)
    }

    pub fn doc_text(&self) -> &str {
        &self.doc
    }

    pub fn style(&self) -> Option<DocStyle> {
        self.doc_style
    }

    pub fn params(&self) -> &Signature {
        &self.signature
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub(crate) fn into_parts(self) -> (String, SharedHandler) {
        (self.identity, self.handler)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .field("doc_style", &self.doc_style)
            .field("signature", &self.signature)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
