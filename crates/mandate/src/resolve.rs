//! Parameter spec resolution.
//!
//! Reconciles the four sources of argument metadata into one
//! [`ParameterDescriptor`] per parameter. For every attribute the precedence
//! is, strongest first:
//!
//! 1. an explicit override recorded with [`Function::arg`](crate::Function::arg)
//! 2. the doc comment
//! 3. the declared type annotation
//! 4. inference from the default value
//! 5. the bare parameter name (aliases only)
//!
//! Positional parameters never take flags: their only alias is their name,
//! and a documented metavar is dropped since the name is what clap shows.

use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

use crate::alias::{ensure_dashes, parse_flag};
use crate::docs::DocParam;
use crate::error::SetupError;
use crate::infer::infer;
use crate::overrides::{ArgOptions, OverrideEntry, Overrides};
use crate::signature::{ParamKind, Parameter, Signature};
use crate::value::{Value, ValueType};

/// How the parser stores a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Store the (coerced) value.
    Store,
    /// Store `true` when the flag is present.
    StoreTrue,
    /// Store `false` when the flag is present.
    StoreFalse,
    /// Accumulate one value per occurrence.
    Append,
    /// Collect all remaining positional tokens.
    Collect,
}

impl Action {
    /// Looks up an action by its conventional name.
    pub fn from_name(name: &str) -> Option<Action> {
        match name {
            "store" => Some(Action::Store),
            "store_true" => Some(Action::StoreTrue),
            "store_false" => Some(Action::StoreFalse),
            "append" => Some(Action::Append),
            "collect" => Some(Action::Collect),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Store => "store",
            Action::StoreTrue => "store_true",
            Action::StoreFalse => "store_false",
            Action::Append => "append",
            Action::Collect => "collect",
        }
    }

    /// True for actions that take no value on the command line.
    pub fn is_toggle(&self) -> bool {
        matches!(self, Action::StoreTrue | Action::StoreFalse)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The resolved argument specification of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParamKind,
    /// Present iff the parameter is optional.
    pub default: Option<Value>,
    pub value_type: Option<ValueType>,
    /// Dashed flags for optionals, `[name]` otherwise.
    pub aliases: Vec<String>,
    pub help: String,
    pub metavar: Option<String>,
    pub action: Action,
    pub repeatable: bool,
    /// Key the parsed value is stored under.
    pub dest: String,
}

impl ParameterDescriptor {
    pub fn is_positional(&self) -> bool {
        self.kind == ParamKind::Positional
    }

    pub fn is_optional(&self) -> bool {
        self.kind == ParamKind::Optional
    }

    pub fn is_variadic(&self) -> bool {
        self.kind == ParamKind::Variadic
    }
}

/// Resolves every parameter of a signature into a descriptor.
///
/// Descriptors come back in signature order, so the variadic parameter (if
/// any) is last. Documented or overridden names that match no parameter are
/// ignored.
///
/// # Errors
///
/// Fails with [`SetupError`] when the signature breaks its invariants, when
/// an alias cannot be expressed as a flag, when a flag or destination is
/// used twice, or when a positional parameter is given flag aliases.
///
/// ```rust
/// use mandate::{find_param_docs, resolve, Action, Overrides, Signature};
///
/// let sig = Signature::new().positional("a").optional("b", 1);
/// let docs = find_param_docs(":param -b <int>: The b.");
/// let params = resolve("analiased", &sig, &docs, &Overrides::new()).unwrap();
///
/// assert_eq!(params[0].aliases, vec!["a"]);
/// assert_eq!(params[1].aliases, vec!["-b"]);
/// assert_eq!(params[1].action, Action::Store);
/// ```
pub fn resolve(
    function: &str,
    signature: &Signature,
    docs: &HashMap<String, DocParam>,
    overrides: &Overrides,
) -> Result<Vec<ParameterDescriptor>, SetupError> {
    signature.validate(function)?;

    let mut descriptors = Vec::with_capacity(signature.len());
    let mut flags = HashSet::new();
    let mut dests = HashSet::new();

    for param in signature.params() {
        let doc = docs.get(&param.name);
        let entry = overrides.get(&param.name);

        let descriptor = match param.kind {
            ParamKind::Optional => resolve_optional(param, doc, entry)?,
            ParamKind::Positional | ParamKind::Variadic => resolve_unflagged(param, doc, entry)?,
        };

        if descriptor.is_optional() {
            for flag in &descriptor.aliases {
                if !flags.insert(flag.clone()) {
                    return Err(SetupError::invalid_option(
                        &param.name,
                        format!("flag `{}` is used more than once in `{}`", flag, function),
                    ));
                }
            }
        }
        check_dest(&param.name, &descriptor.dest)?;
        if !dests.insert(descriptor.dest.clone()) {
            return Err(SetupError::invalid_option(
                &param.name,
                format!("destination `{}` is used more than once", descriptor.dest),
            ));
        }

        trace!(
            function,
            param = %descriptor.name,
            aliases = ?descriptor.aliases,
            action = %descriptor.action,
            value_type = ?descriptor.value_type,
            "resolved parameter"
        );
        descriptors.push(descriptor);
    }

    for name in docs.keys().filter(|k| signature.get(k).is_none()) {
        debug!(function, param = %name, "documented parameter not in signature, ignored");
    }
    for name in overrides.names().filter(|k| signature.get(k).is_none()) {
        debug!(function, param = %name, "override for unknown parameter, ignored");
    }

    Ok(descriptors)
}

/// Rejects destinations that clap keeps for its own arguments.
pub(crate) fn check_dest(name: &str, dest: &str) -> Result<(), SetupError> {
    if dest == "help" {
        return Err(SetupError::invalid_option(
            name,
            "destination `help` is reserved for the help flag",
        ));
    }
    Ok(())
}

/// Lowest layer: what the doc comment and the annotation say.
fn documented_options(param: &Parameter, doc: Option<&DocParam>) -> ArgOptions {
    ArgOptions {
        value_type: doc.and_then(|d| d.value_type).or(param.annotation),
        help: doc.map(|d| d.help.clone()),
        metavar: doc.and_then(|d| d.metavar.clone()),
        ..Default::default()
    }
}

fn merged_options(
    param: &Parameter,
    doc: Option<&DocParam>,
    entry: Option<&OverrideEntry>,
) -> ArgOptions {
    let base = documented_options(param, doc);
    match entry {
        Some(entry) => entry.options.merge_over(&base),
        None => base,
    }
}

fn resolve_unflagged(
    param: &Parameter,
    doc: Option<&DocParam>,
    entry: Option<&OverrideEntry>,
) -> Result<ParameterDescriptor, SetupError> {
    if let Some(flag) = entry.and_then(|e| e.aliases.iter().find(|a| a.starts_with('-'))) {
        return Err(SetupError::invalid_option(
            &param.name,
            format!("positional parameter cannot take flag `{}`", flag),
        ));
    }

    let mut options = documented_options(param, doc);
    // Only an explicit override may set a positional's metavar.
    options.metavar = None;
    if let Some(entry) = entry {
        options = entry.options.merge_over(&options);
    }

    let variadic = param.kind == ParamKind::Variadic;
    Ok(ParameterDescriptor {
        name: param.name.clone(),
        kind: param.kind,
        default: None,
        value_type: options.value_type,
        aliases: vec![param.name.clone()],
        help: options.help.unwrap_or_default(),
        metavar: options.metavar,
        action: if variadic { Action::Collect } else { Action::Store },
        repeatable: variadic,
        dest: options.dest.unwrap_or_else(|| param.name.clone()),
    })
}

fn resolve_optional(
    param: &Parameter,
    doc: Option<&DocParam>,
    entry: Option<&OverrideEntry>,
) -> Result<ParameterDescriptor, SetupError> {
    let options = merged_options(param, doc, entry);

    let raw_aliases = match entry.filter(|e| !e.aliases.is_empty()) {
        Some(entry) => entry.aliases.clone(),
        None => doc
            .map(|d| d.aliases.clone())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| vec![param.name.clone()]),
    };
    flagged(&param.name, &raw_aliases, options, param.default.clone())
}

/// Builds the descriptor of a flagged option.
///
/// Shared by function parameters and group options. `fallback_default` is
/// used when `options` carries no default of its own.
pub(crate) fn flagged(
    name: &str,
    raw_aliases: &[String],
    options: ArgOptions,
    fallback_default: Option<Value>,
) -> Result<ParameterDescriptor, SetupError> {
    let aliases = ensure_dashes(raw_aliases);
    for alias in &aliases {
        parse_flag(alias).map_err(|reason| SetupError::invalid_option(name, reason))?;
        if alias == "-h" || alias == "--help" {
            return Err(SetupError::invalid_option(
                name,
                format!("`{}` is reserved for help", alias),
            ));
        }
    }

    let default = options.default.or(fallback_default).unwrap_or_default();
    let inferred = infer(&default);
    let action = options.action.unwrap_or(inferred.action);
    if action == Action::Collect {
        return Err(SetupError::invalid_option(
            name,
            "only the variadic parameter can collect positional values",
        ));
    }
    let value_type = if action.is_toggle() {
        None
    } else {
        options.value_type.or(inferred.value_type)
    };

    Ok(ParameterDescriptor {
        name: name.to_string(),
        kind: ParamKind::Optional,
        default: Some(default),
        value_type,
        aliases,
        help: options.help.unwrap_or_default(),
        metavar: options.metavar,
        action,
        repeatable: action == Action::Append,
        dest: options.dest.unwrap_or_else(|| name.to_string()),
    })
}
