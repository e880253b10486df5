//! Parameter types and value coercion
//!
//! Raw edits usually arrive as command-line text. Each schema type knows how
//! to turn such input into a JSON value of that type.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::constants::boolean;
use crate::error::{FanctlError, Result};

/// Declared type of a strategy parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
}

impl ParamType {
    /// Schema keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Boolean => "boolean",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Array => "array",
        }
    }

    /// Convert raw input into a value of this type
    ///
    /// `param` is only used for error messages.
    pub fn coerce(&self, param: &str, raw: &Value) -> Result<Value> {
        let coerced = match self {
            ParamType::Boolean => coerce_boolean(raw).map(Value::Bool),
            ParamType::Integer => coerce_integer(raw).map(Value::Number),
            ParamType::Number => coerce_number(raw).map(Value::Number),
            ParamType::String => Some(Value::String(coerce_string(raw))),
            ParamType::Array => {
                return Err(FanctlError::config_parsing(format!(
                    "Editing list parameter '{}' is not supported",
                    param
                )));
            }
        };

        coerced.ok_or_else(|| {
            FanctlError::config_parsing(format!(
                "Invalid value for '{}': {}",
                param,
                display_raw(raw)
            ))
        })
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = FanctlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "boolean" => Ok(ParamType::Boolean),
            "integer" => Ok(ParamType::Integer),
            "number" => Ok(ParamType::Number),
            "string" => Ok(ParamType::String),
            "array" => Ok(ParamType::Array),
            other => Err(FanctlError::schema(format!(
                "unsupported parameter type '{}'",
                other
            ))),
        }
    }
}

fn coerce_boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::String(text) => {
            let lowered = text.to_lowercase();
            if boolean::TRUE_LITERALS.contains(&lowered.as_str()) {
                Some(true)
            } else if boolean::FALSE_LITERALS.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        other => Some(is_truthy(other)),
    }
}

fn coerce_integer(raw: &Value) -> Option<Number> {
    match raw {
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .map(Number::from)
                .or_else(|_| text.parse::<u64>().map(Number::from))
                .ok()
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.clone()),
        // Floats truncate toward zero
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| Number::from(f.trunc() as i64)),
        Value::Bool(b) => Some(Number::from(i64::from(*b))),
        _ => None,
    }
}

fn coerce_number(raw: &Value) -> Option<Number> {
    let parsed = match raw {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };
    // NaN and infinities have no JSON representation
    Number::from_f64(parsed)
}

fn coerce_string(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// JSON truthiness: null, false, zero, and empty containers are false
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn display_raw(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
