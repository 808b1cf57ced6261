//! Error types for registry construction, parsing, and value access.
//!
//! Each concern has its own enum so hosts can branch on the kind of failure
//! instead of matching message text. Every variant carries the structured
//! fields needed to produce a useful message.

use thiserror::Error;

use crate::{OptionKind, ParameterType};
use crate::validate::ValidationError;

/// Renders a slot signature as `INT, STRING`.
pub(crate) fn signature_string(signature: &[ParameterType]) -> String {
    signature
        .iter()
        .map(ParameterType::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while declaring options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// An option with the same long name is already registered.
    #[error("duplicate option name: {name}")]
    DuplicateOptionName { name: String },
    /// Another option already uses this short alias.
    #[error("duplicate short name '{short}' (already used by '{existing}')")]
    DuplicateShortName { short: String, existing: String },
    /// A flag was declared with slots other than one boolean defaulting to
    /// false.
    #[error("flag '{name}' must have a single boolean slot defaulting to false")]
    InvalidFlagSlots { name: String },
    /// A schema document failed structural validation.
    #[error("invalid schema: {0}")]
    Invalid(#[from] ValidationError),
}

/// Errors raised by the parse loop.
///
/// Any of these aborts the whole parse and restores the registry to its
/// state before the call; there is no partial-success mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A prefixed token did not match any registered option.
    #[error("unknown parameter \"{token}\"")]
    UnknownOption { token: String },
    /// A slot needed a token but the queue was already empty.
    #[error("missing value for {option}: slot {slot} expects {expected}")]
    MissingValue {
        option: String,
        slot: usize,
        expected: ParameterType,
    },
    /// A token could not be converted to the slot's declared type.
    #[error(
        "can't parse \"{token}\" as {expected}, {option} expects: {}",
        signature_string(.signature)
    )]
    TypeCoercionFailure {
        option: String,
        token: String,
        expected: ParameterType,
        signature: Vec<ParameterType>,
    },
    /// A single-value option held an unexpected number of cells.
    #[error("option {option} holds {cells} value cell(s), expected exactly one")]
    ValueSlotMismatch { option: String, cells: usize },
    /// The configured default parameter is not registered.
    #[error("default parameter '{name}' is not a registered option")]
    UnknownDefaultParameter { name: String },
    /// The configured default parameter is single-valued and cannot collect
    /// bare tokens.
    #[error("default parameter '{name}' is a {kind}, expected unnamed or multi_parameter")]
    DefaultParameterNotCollecting { name: String, kind: OptionKind },
}

/// Errors raised by the typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No option with this name is registered.
    #[error("no option named '{name}'")]
    UnknownOption { name: String },
    /// A singular accessor found no value.
    #[error("option {option} has no value")]
    NoValue { option: String },
    /// A singular accessor found more than one value.
    #[error("option {option} has {count} values, expected one")]
    MultipleValues { option: String, count: usize },
}

/// Failure of a standalone primary coercion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't parse \"{token}\" as {expected}")]
pub struct CoercionError {
    pub token: String,
    pub expected: ParameterType,
}

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
