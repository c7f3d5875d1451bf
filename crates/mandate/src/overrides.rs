//! Explicit per-parameter overrides.
//!
//! An override is recorded on a [`Function`](crate::Function) before it is
//! registered and beats every other source of metadata for the attributes it
//! sets. Aliases given in an override replace the documented ones outright;
//! keyword options are merged field by field.

use std::collections::HashMap;

use crate::resolve::Action;
use crate::value::{Value, ValueType};

/// Keyword options of an override.
///
/// Every field is optional; unset fields leave the lower-precedence value in
/// place.
///
/// ```rust
/// use mandate::{ArgOptions, ValueType};
///
/// let opts = ArgOptions::new().value_type(ValueType::Integer).metavar("EXP");
/// assert_eq!(opts.value_type, Some(ValueType::Integer));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgOptions {
    pub value_type: Option<ValueType>,
    pub help: Option<String>,
    pub metavar: Option<String>,
    pub default: Option<Value>,
    pub action: Option<Action>,
    pub dest: Option<String>,
}

impl ArgOptions {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn value_type(mut self, ty: ValueType) -> Self {
        self.value_type = Some(ty);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Shallow merge: fields set on `self` win, the rest come from `base`.
    pub fn merge_over(&self, base: &ArgOptions) -> ArgOptions {
        ArgOptions {
            value_type: self.value_type.or(base.value_type),
            help: self.help.clone().or_else(|| base.help.clone()),
            metavar: self.metavar.clone().or_else(|| base.metavar.clone()),
            default: self.default.clone().or_else(|| base.default.clone()),
            action: self.action.or(base.action),
            dest: self.dest.clone().or_else(|| base.dest.clone()),
        }
    }
}

/// Alias tokens and keyword options recorded for one parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideEntry {
    /// Replacement aliases; empty means "keep the documented ones".
    pub aliases: Vec<String>,
    pub options: ArgOptions,
}

/// Overrides of one function, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: HashMap<String, OverrideEntry>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an override, replacing any earlier one for the same parameter.
    pub fn insert<I, S>(&mut self, param: impl Into<String>, aliases: I, options: ArgOptions)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            param.into(),
            OverrideEntry {
                aliases: aliases.into_iter().map(Into::into).collect(),
                options,
            },
        );
    }

    pub fn get(&self, param: &str) -> Option<&OverrideEntry> {
        self.entries.get(param)
    }

    /// Parameter names with a recorded override.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
