//! Value cells and token coercion.
//!
//! A [`ValueCell`] holds one primary value tagged with the type its slot
//! declared. Projections into the other parameter types ("mirrors") are
//! computed on demand and return `None` when no sensible projection exists,
//! leaving the caller to pick a default.

use serde::{Deserialize, Serialize};

use crate::ParameterType;
use crate::error::CoercionError;

const FALSY: [&str; 6] = ["0", "false", "off", "disabled", "disable", "no"];
const TRUTHY: [&str; 6] = ["1", "true", "on", "enabled", "enable", "yes"];

const HEX_PREFIX: &str = "0x";

/// Primary value stored in a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Value {
    /// No value (an unset default).
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Decimal(f64),
}

/// One coerced value plus the type its slot declared.
///
/// # Examples
///
/// ```
/// use optline_core::{ParameterType, ValueCell};
///
/// let cell = ValueCell::parse(ParameterType::Integer, "0x1F").unwrap();
/// assert_eq!(cell.as_i64(), Some(31));
/// assert_eq!(cell.as_bool(), Some(true));
/// assert_eq!(cell.as_decimal(), Some(31.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCell {
    /// Type declared by the slot that produced this cell.
    pub declared: ParameterType,
    /// The primary value.
    pub value: Value,
}

impl ValueCell {
    /// Creates a cell from an already-typed value.
    pub fn new(declared: ParameterType, value: Value) -> Self {
        Self { declared, value }
    }

    /// Creates a string cell holding `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ParameterType::String, Value::Text(text.into()))
    }

    /// Creates a boolean cell.
    pub fn boolean(value: bool) -> Self {
        Self::new(ParameterType::Boolean, Value::Boolean(value))
    }

    /// Strictly coerces `token` into `declared`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when the token is not a valid literal of the
    /// declared type.
    pub fn parse(declared: ParameterType, token: &str) -> Result<Self, CoercionError> {
        let value = match declared {
            ParameterType::String => Value::Text(token.to_string()),
            ParameterType::Integer => Value::Integer(parse_integer(token)?),
            ParameterType::Boolean => Value::Boolean(parse_boolean(token)?),
            ParameterType::Decimal => Value::Decimal(parse_decimal(token)?),
        };
        Ok(Self::new(declared, value))
    }

    /// Seeds a cell from a schema default.
    ///
    /// A default that does not coerce is kept as text so its mirrors degrade
    /// like any other text instead of failing the declaration.
    pub fn seed(declared: ParameterType, default: Option<&str>) -> Self {
        match default {
            None => Self::new(declared, Value::Null),
            Some(raw) => Self::parse(declared, raw)
                .unwrap_or_else(|_| Self::new(declared, Value::Text(raw.to_string()))),
        }
    }

    /// Integer mirror.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.value {
            Value::Null => None,
            Value::Integer(v) => Some(*v),
            Value::Boolean(b) => Some(i64::from(*b)),
            // `as` saturates, which is the closest thing to truncation we have
            Value::Decimal(d) => Some(d.trunc() as i64),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Boolean mirror.
    ///
    /// Text in a string-typed cell is truthy because it is present. Text
    /// left in a cell of another type (an uncoercible default) must be one
    /// of the boolean literals.
    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            Value::Null => Some(false),
            Value::Integer(v) => Some(*v != 0),
            Value::Boolean(b) => Some(*b),
            Value::Decimal(d) => Some(*d != 0.0),
            Value::Text(_) if self.declared == ParameterType::String => Some(true),
            Value::Text(s) => parse_boolean(s).ok(),
        }
    }

    /// Decimal mirror.
    pub fn as_decimal(&self) -> Option<f64> {
        match &self.value {
            Value::Null => None,
            Value::Integer(v) => Some(*v as f64),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Decimal(d) => Some(*d),
            Value::Text(s) => parse_decimal(s).ok(),
        }
    }

    /// String mirror. `None` only for null cells.
    pub fn as_string(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Integer(v) => Some(v.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Decimal(d) => Some(d.to_string()),
        }
    }
}

/// Parses a boolean synonym.
///
/// # Examples
///
/// ```
/// use optline_core::parse_boolean;
///
/// assert_eq!(parse_boolean(" Enabled "), Ok(true));
/// assert_eq!(parse_boolean("off"), Ok(false));
/// assert!(parse_boolean("maybe").is_err());
/// ```
pub fn parse_boolean(token: &str) -> Result<bool, CoercionError> {
    let low = token.trim().to_lowercase();
    if FALSY.contains(&low.as_str()) {
        Ok(false)
    } else if TRUTHY.contains(&low.as_str()) {
        Ok(true)
    } else {
        Err(coercion_error(token, ParameterType::Boolean))
    }
}

/// Parses a decimal integer, or a hexadecimal one with a `0x` prefix.
///
/// Hex digits are read as a 64-bit two's complement pattern, so
/// `0xFFFFFFFFFFFFFFFF` is `-1`.
pub fn parse_integer(token: &str) -> Result<i64, CoercionError> {
    let trimmed = token.trim();
    let parsed = match trimmed.strip_prefix(HEX_PREFIX) {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            u64::from_str_radix(digits, 16).ok().map(|v| v as i64)
        }
        Some(_) => None,
        None => trimmed.parse::<i64>().ok(),
    };
    parsed.ok_or_else(|| coercion_error(token, ParameterType::Integer))
}

/// Parses a finite decimal number.
pub fn parse_decimal(token: &str) -> Result<f64, CoercionError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| coercion_error(token, ParameterType::Decimal))
}

fn coercion_error(token: &str, expected: ParameterType) -> CoercionError {
    CoercionError {
        token: token.to_string(),
        expected,
    }
}
