//! Dynamic values passed between the parser and command handlers.
//!
//! The resolver works on parameter descriptions, not Rust types, so every
//! default, parsed value and call argument is carried as a [`Value`]. Handlers
//! written by hand read their arguments with the `as_*` accessors; handlers
//! generated by `#[command]` convert them back into Rust types through
//! [`FromValue`].
//!
//! # Coercion
//!
//! [`ValueType`] names the three coercions the parser knows about. Parameters
//! without a type keep the raw text the user typed, which is why the
//! [`FromValue`] impls for numbers and booleans also accept [`Value::Text`]:
//!
//! ```rust
//! use mandate::{FromValue, Value};
//!
//! let n = i64::from_value(Value::Text("42".into())).unwrap();
//! assert_eq!(n, 42);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A runtime value: a default, a parsed argument, or a handler result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value (an optional parameter defaulting to nothing).
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns true for [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    /// Converts the value into JSON.
    pub fn to_json(&self) -> serde_json::Value {
        // Only non-finite floats can fail; JSON has no spelling for them.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n)
            .map(Value::Int)
            .unwrap_or(Value::Float(n as f64))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n)
            .map(Value::Int)
            .unwrap_or(Value::Float(n as f64))
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Text(obj.to_string()),
        }
    }
}

// =============================================================================
// Coercion types
// =============================================================================

/// The coercion applied to a parameter's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Float,
    Text,
}

impl ValueType {
    /// Looks up a type name as written in doc comments.
    ///
    /// Unknown names are not an error: they simply carry no coercion.
    ///
    /// ```rust
    /// use mandate::ValueType;
    ///
    /// assert_eq!(ValueType::from_name("num"), Some(ValueType::Integer));
    /// assert_eq!(ValueType::from_name("s"), Some(ValueType::Text));
    /// assert_eq!(ValueType::from_name("int or float"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<ValueType> {
        match name.trim() {
            "n" | "num" | "number" | "i" | "int" | "integer" => Some(ValueType::Integer),
            "s" | "str" | "string" => Some(ValueType::Text),
            "f" | "float" => Some(ValueType::Float),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
        }
    }

    /// Parses raw text into a value of this type.
    pub fn coerce(&self, raw: &str) -> Result<Value, ValueError> {
        match self {
            ValueType::Integer => raw.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                ValueError::Parse {
                    input: raw.to_string(),
                    expected: "integer",
                }
            }),
            ValueType::Float => raw.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                ValueError::Parse {
                    input: raw.to_string(),
                    expected: "float",
                }
            }),
            ValueType::Text => Ok(Value::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Conversion back into Rust types
// =============================================================================

/// Errors converting a [`Value`] into a Rust type.
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("cannot parse '{input}' as {expected}")]
    Parse {
        input: String,
        expected: &'static str,
    },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("missing argument")]
    Missing,

    /// Wraps an error with the parameter it happened on.
    #[error("argument `{name}`: {source}")]
    Argument {
        name: String,
        #[source]
        source: Box<ValueError>,
    },
}

/// Conversion from a [`Value`] into a concrete Rust type.
///
/// Implemented for the scalar types the parser produces, `String`,
/// `Option<T>`, `Vec<T>` and [`Value`] itself.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
            other => Err(ValueError::TypeMismatch {
                expected: "text",
                actual: other.type_name(),
            }),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(n) => Ok(n != 0),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(ValueError::Parse {
                    input: s,
                    expected: "bool",
                }),
            },
            other => Err(ValueError::TypeMismatch {
                expected: "bool",
                actual: other.type_name(),
            }),
        }
    }
}

macro_rules! from_value_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let n = match value {
                        Value::Int(n) => n,
                        Value::Text(ref s) => s.trim().parse::<i64>().map_err(|_| ValueError::Parse {
                            input: s.clone(),
                            expected: "integer",
                        })?,
                        other => {
                            return Err(ValueError::TypeMismatch {
                                expected: "integer",
                                actual: other.type_name(),
                            })
                        }
                    };
                    <$t>::try_from(n).map_err(|_| ValueError::OutOfRange {
                        value: n.to_string(),
                        target: stringify!($t),
                    })
                }
            }
        )*
    };
}

from_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            Value::Text(s) => s.trim().parse::<f64>().map_err(|_| ValueError::Parse {
                input: s,
                expected: "float",
            }),
            other => Err(ValueError::TypeMismatch {
                expected: "float",
                actual: other.type_name(),
            }),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::None => Ok(Vec::new()),
            other => Ok(vec![T::from_value(other)?]),
        }
    }
}

/// Takes the next call argument and converts it, naming the parameter on failure.
///
/// Used by handlers generated with `#[command]`.
pub fn next_arg<T, I>(args: &mut I, name: &str) -> Result<T, ValueError>
where
    T: FromValue,
    I: Iterator<Item = Value>,
{
    let value = args.next().ok_or_else(|| ValueError::Argument {
        name: name.to_string(),
        source: Box::new(ValueError::Missing),
    })?;
    T::from_value(value).map_err(|e| ValueError::Argument {
        name: name.to_string(),
        source: Box::new(e),
    })
}

/// Collects the remaining call arguments (the variadic tail).
pub fn rest_args<T, I>(args: I, name: &str) -> Result<Vec<T>, ValueError>
where
    T: FromValue,
    I: Iterator<Item = Value>,
{
    args.map(T::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ValueError::Argument {
            name: name.to_string(),
            source: Box::new(e),
        })
}
