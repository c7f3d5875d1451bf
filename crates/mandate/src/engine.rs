//! clap adapter.
//!
//! Turns resolved [`ParameterDescriptor`]s into `clap::Arg`s and reads parsed
//! values back out of `ArgMatches`. Nothing outside this module touches clap's
//! argument API, so the resolver stays independent of the parsing engine.
//!
//! Defaults are never handed to clap. An argument that was not given on the
//! command line takes its descriptor default when values are extracted, which
//! keeps non-text defaults (`None`, lists, numbers) intact.

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches};

use crate::alias::{parse_flag, Flag};
use crate::resolve::{Action, ParameterDescriptor};
use crate::signature::ParamKind;
use crate::value::{Value, ValueType};

/// Builds the clap argument of one descriptor.
pub(crate) fn to_arg(desc: &ParameterDescriptor) -> Arg {
    let mut arg = Arg::new(desc.dest.clone());
    if !desc.help.is_empty() {
        arg = arg.help(desc.help.clone());
    }

    match desc.kind {
        ParamKind::Positional => {
            arg = typed(
                arg.required(true)
                    .action(ArgAction::Set)
                    .allow_negative_numbers(true),
                desc.value_type,
            );
            if let Some(metavar) = &desc.metavar {
                arg = arg.value_name(metavar.clone());
            }
            arg
        }
        ParamKind::Variadic => {
            arg = typed(
                arg.num_args(0..)
                    .action(ArgAction::Append)
                    .allow_negative_numbers(true),
                desc.value_type,
            );
            if let Some(metavar) = &desc.metavar {
                arg = arg.value_name(metavar.clone());
            }
            arg
        }
        ParamKind::Optional => {
            arg = with_flags(arg, &desc.aliases);
            match desc.action {
                Action::StoreTrue => arg.action(ArgAction::SetTrue),
                Action::StoreFalse => arg.action(ArgAction::SetFalse),
                Action::Store | Action::Append | Action::Collect => {
                    let action = if desc.action == Action::Store {
                        ArgAction::Set
                    } else {
                        ArgAction::Append
                    };
                    let value_name = desc
                        .metavar
                        .clone()
                        .unwrap_or_else(|| desc.dest.to_uppercase());
                    typed(arg.action(action).required(false), desc.value_type)
                        .value_name(value_name)
                }
            }
        }
    }
}

fn typed(arg: Arg, value_type: Option<ValueType>) -> Arg {
    match value_type {
        Some(ValueType::Integer) => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        Some(ValueType::Float) => arg
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true),
        Some(ValueType::Text) | None => arg.value_parser(value_parser!(String)),
    }
}

/// Attaches flags: the first short and first long are primary, the rest are
/// visible aliases. Flags were validated at resolution time.
fn with_flags(mut arg: Arg, aliases: &[String]) -> Arg {
    let mut has_short = false;
    let mut has_long = false;
    for flag in aliases.iter().filter_map(|a| parse_flag(a).ok()) {
        match flag {
            Flag::Short(c) if !has_short => {
                arg = arg.short(c);
                has_short = true;
            }
            Flag::Short(c) => arg = arg.visible_short_alias(c),
            Flag::Long(name) if !has_long => {
                arg = arg.long(name);
                has_long = true;
            }
            Flag::Long(name) => arg = arg.visible_alias(name),
        }
    }
    arg
}

fn given(matches: &ArgMatches, id: &str) -> bool {
    matches.try_contains_id(id).unwrap_or(false)
        && matches.value_source(id) == Some(ValueSource::CommandLine)
}

fn one(matches: &ArgMatches, id: &str, value_type: Option<ValueType>) -> Option<Value> {
    match value_type {
        Some(ValueType::Integer) => matches
            .try_get_one::<i64>(id)
            .ok()
            .flatten()
            .map(|n| Value::Int(*n)),
        Some(ValueType::Float) => matches
            .try_get_one::<f64>(id)
            .ok()
            .flatten()
            .map(|x| Value::Float(*x)),
        Some(ValueType::Text) | None => matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(|s| Value::Text(s.clone())),
    }
}

fn many(matches: &ArgMatches, id: &str, value_type: Option<ValueType>) -> Vec<Value> {
    match value_type {
        Some(ValueType::Integer) => matches
            .try_get_many::<i64>(id)
            .ok()
            .flatten()
            .map(|vals| vals.map(|n| Value::Int(*n)).collect())
            .unwrap_or_default(),
        Some(ValueType::Float) => matches
            .try_get_many::<f64>(id)
            .ok()
            .flatten()
            .map(|vals| vals.map(|x| Value::Float(*x)).collect())
            .unwrap_or_default(),
        Some(ValueType::Text) | None => matches
            .try_get_many::<String>(id)
            .ok()
            .flatten()
            .map(|vals| vals.map(|s| Value::Text(s.clone())).collect())
            .unwrap_or_default(),
    }
}

/// Reads the value of one descriptor, falling back to its default.
pub(crate) fn extract(matches: &ArgMatches, desc: &ParameterDescriptor) -> Value {
    let id = desc.dest.as_str();
    let default = || desc.default.clone().unwrap_or_default();

    match desc.action {
        Action::StoreTrue | Action::StoreFalse if given(matches, id) => {
            Value::Bool(desc.action == Action::StoreTrue)
        }
        Action::StoreTrue | Action::StoreFalse => default(),
        Action::Store => one(matches, id, desc.value_type).unwrap_or_else(default),
        Action::Append if given(matches, id) => {
            let mut items = match default() {
                Value::List(items) => items,
                Value::None => Vec::new(),
                other => vec![other],
            };
            items.extend(many(matches, id, desc.value_type));
            Value::List(items)
        }
        Action::Append => default(),
        Action::Collect => Value::List(many(matches, id, desc.value_type)),
    }
}

/// Subcommand names from the root to the deepest selected command.
pub(crate) fn extract_command_path(matches: &ArgMatches) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = matches;

    while let Some((name, sub)) = current.subcommand() {
        path.push(name.to_string());
        current = sub;
    }

    path
}
