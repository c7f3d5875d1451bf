//! Action and type inference from default values.

use crate::resolve::Action;
use crate::value::{Value, ValueType};

/// What a default value says about how its parameter should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inference {
    pub action: Action,
    pub value_type: Option<ValueType>,
}

/// Infers a parse action and coercion type from a default value.
///
/// A boolean default yields a toggle that stores the negation of the default
/// when the flag is present. A list default accumulates one raw value per
/// occurrence. Integer, float and text defaults coerce to their own type.
/// `None` keeps the raw text.
///
/// ```rust
/// use mandate::{infer, Action, Value, ValueType};
///
/// assert_eq!(infer(&Value::Bool(true)).action, Action::StoreFalse);
/// assert_eq!(infer(&Value::Int(24)).value_type, Some(ValueType::Integer));
/// ```
pub fn infer(default: &Value) -> Inference {
    match default {
        Value::Bool(true) => Inference {
            action: Action::StoreFalse,
            value_type: None,
        },
        Value::Bool(false) => Inference {
            action: Action::StoreTrue,
            value_type: None,
        },
        Value::List(_) => Inference {
            action: Action::Append,
            value_type: None,
        },
        Value::Int(_) => store(Some(ValueType::Integer)),
        Value::Float(_) => store(Some(ValueType::Float)),
        Value::Text(_) => store(Some(ValueType::Text)),
        Value::None => store(None),
    }
}

fn store(value_type: Option<ValueType>) -> Inference {
    Inference {
        action: Action::Store,
        value_type,
    }
}
