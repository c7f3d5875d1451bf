//! Explicit parameter lists.
//!
//! Rust functions cannot be inspected at runtime, so the parameter list a
//! command is built from is described with a [`Signature`]. The
//! `#[command]` attribute macro writes this description from the function's
//! own signature; it can also be built by hand:
//!
//! ```rust
//! use mandate::{Signature, ValueType};
//!
//! // fn vara(pos, foo, spam = 24, *vars)
//! let sig = Signature::new()
//!     .positional("pos")
//!     .positional("foo")
//!     .optional("spam", 24)
//!     .variadic("vars");
//! assert_eq!(sig.len(), 4);
//!
//! // fn repeat(what: str, times: int = 10)
//! let sig = Signature::new()
//!     .positional("what")
//!     .optional("times", 10)
//!     .annotate("what", ValueType::Text)
//!     .annotate("times", ValueType::Integer);
//! assert_eq!(sig.get("what").unwrap().annotation, Some(ValueType::Text));
//! ```

use std::collections::HashSet;

use crate::error::SetupError;
use crate::value::{Value, ValueType};

/// How a parameter is supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// No default: a required, unflagged argument.
    Positional,
    /// Has a default: a flagged option.
    Optional,
    /// Trailing parameter collecting any number of extra positional tokens.
    Variadic,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    /// Present iff `kind` is [`ParamKind::Optional`].
    pub default: Option<Value>,
    /// Type declared by the function itself (the Rust type, for macro users).
    pub annotation: Option<ValueType>,
}

impl Parameter {
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional,
            default: None,
            annotation: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Optional,
            default: Some(default.into()),
            annotation: None,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Variadic,
            default: None,
            annotation: None,
        }
    }

    /// Sets the declared type.
    pub fn annotated(mut self, ty: ValueType) -> Self {
        self.annotation = Some(ty);
        self
    }
}

/// Ordered parameter list of one function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn positional(self, name: impl Into<String>) -> Self {
        self.param(Parameter::positional(name))
    }

    pub fn optional(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.param(Parameter::optional(name, default))
    }

    pub fn variadic(self, name: impl Into<String>) -> Self {
        self.param(Parameter::variadic(name))
    }

    /// Sets the declared type of an already added parameter.
    ///
    /// Unknown names are ignored.
    pub fn annotate(mut self, name: &str, ty: ValueType) -> Self {
        if let Some(param) = self.params.iter_mut().find(|p| p.name == name) {
            param.annotation = Some(ty);
        }
        self
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The variadic parameter, if one is declared.
    pub fn variadic_param(&self) -> Option<&Parameter> {
        self.params.iter().find(|p| p.kind == ParamKind::Variadic)
    }

    /// Checks the invariants the resolver relies on.
    ///
    /// Names are unique, positionals come before optionals, and at most one
    /// variadic parameter exists, in last position.
    pub fn validate(&self, function: &str) -> Result<(), SetupError> {
        let invalid = |reason: String| SetupError::InvalidSignature {
            function: function.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        let mut saw_optional = false;
        for (i, param) in self.params.iter().enumerate() {
            if param.name.is_empty() {
                return Err(invalid(format!("parameter {} has an empty name", i)));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(invalid(format!("parameter `{}` declared twice", param.name)));
            }
            match param.kind {
                ParamKind::Positional if saw_optional => {
                    return Err(invalid(format!(
                        "positional `{}` follows an optional parameter",
                        param.name
                    )));
                }
                ParamKind::Positional => {}
                ParamKind::Optional => saw_optional = true,
                ParamKind::Variadic if i + 1 != self.params.len() => {
                    return Err(invalid(format!(
                        "variadic `{}` must be the last parameter",
                        param.name
                    )));
                }
                ParamKind::Variadic => {}
            }
        }
        Ok(())
    }
}
