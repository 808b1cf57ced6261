//! Option model: kinds, slots, definitions, and runtime records.
//!
//! An [`OptionDef`] is the declarative half of an option and can be
//! deserialized from a schema document. Registering it produces an
//! [`OptionRecord`], which additionally carries the value cells, occurrence
//! count and user-set flag that the parse loop mutates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::value::{ValueCell, parse_boolean};

/// Role an option plays on the command line.
///
/// # Examples
///
/// ```
/// use optline_core::OptionKind;
///
/// assert!(OptionKind::Parameter.is_single_valued());
/// assert!(!OptionKind::MultiParameter.is_single_valued());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Bare-word selector (e.g. `build`).
    Verb,
    /// Named option taking exactly one value group (the default).
    #[default]
    Parameter,
    /// Zero-argument boolean switch.
    Flag,
    /// Named option that accumulates one value group per occurrence.
    MultiParameter,
    /// Sink for unmatched bare tokens.
    Unnamed,
}

impl OptionKind {
    /// Verbs and parameters hold exactly one value cell.
    pub fn is_single_valued(self) -> bool {
        matches!(self, Self::Verb | Self::Parameter)
    }

    /// Kinds that can serve as the default parameter, which may receive any
    /// number of bare tokens.
    pub fn collects_bare_tokens(self) -> bool {
        matches!(self, Self::MultiParameter | Self::Unnamed)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verb => "verb",
            Self::Parameter => "parameter",
            Self::Flag => "flag",
            Self::MultiParameter => "multi_parameter",
            Self::Unnamed => "unnamed",
        };
        f.write_str(name)
    }
}

/// Type a slot coerces its token into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    #[default]
    String,
    Integer,
    Boolean,
    Decimal,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "STRING",
            Self::Integer => "INT",
            Self::Boolean => "BOOL",
            Self::Decimal => "DECIMAL",
        };
        f.write_str(name)
    }
}

/// One declared value position of an option.
///
/// # Examples
///
/// ```
/// use optline_core::{ParameterSlot, ParameterType};
///
/// let port = ParameterSlot::with_default(ParameterType::Integer, "8080");
/// assert_eq!(port.ty, ParameterType::Integer);
/// assert_eq!(port.default.as_deref(), Some("8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSlot {
    /// Declared type.
    #[serde(rename = "type", default)]
    pub ty: ParameterType,
    /// Raw default, coerced when the option is registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterSlot {
    /// A slot without a default.
    pub fn new(ty: ParameterType) -> Self {
        Self { ty, default: None }
    }

    /// A slot with a raw default value.
    pub fn with_default(ty: ParameterType, default: impl Into<String>) -> Self {
        Self {
            ty,
            default: Some(default.into()),
        }
    }

    /// The implicit slot every flag carries.
    pub fn flag() -> Self {
        Self::with_default(ParameterType::Boolean, "false")
    }

    /// Whether this slot can back a flag: boolean, and off unless named.
    pub fn is_flag_slot(&self) -> bool {
        self.ty == ParameterType::Boolean
            && self
                .default
                .as_deref()
                .is_none_or(|raw| parse_boolean(raw) == Ok(false))
    }
}

/// Whether `slots` is a legal slot list for a flag. An empty list gets the
/// implicit [`ParameterSlot::flag`].
pub fn is_valid_flag_slots(slots: &[ParameterSlot]) -> bool {
    match slots {
        [] => true,
        [slot] => slot.is_flag_slot(),
        _ => false,
    }
}

/// Declarative description of one option.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionDef, OptionKind, ParameterType, ParameterSlot};
///
/// let def = OptionDef::new("port", OptionKind::Parameter)
///     .with_short("p")
///     .with_slot(ParameterSlot::with_default(ParameterType::Integer, "80"))
///     .with_description("Port to listen on");
/// assert_eq!(def.signature(), vec![ParameterType::Integer]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Long name, matched after the long prefix or as a bare verb.
    pub name: String,
    /// Short alias, matched after the short prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default)]
    pub kind: OptionKind,
    /// Declared value positions, filled in order on each occurrence.
    #[serde(default)]
    pub slots: Vec<ParameterSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDef {
    /// Creates a definition with no short alias and no slots.
    ///
    /// Flags get their implicit boolean slot when registered.
    pub fn new(name: &str, kind: OptionKind) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            kind,
            slots: Vec::new(),
            description: None,
        }
    }

    pub fn with_short(mut self, short: &str) -> Self {
        self.short = Some(short.to_string());
        self
    }

    pub fn with_slot(mut self, slot: ParameterSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Declared slot types in order.
    pub fn signature(&self) -> Vec<ParameterType> {
        self.slots.iter().map(|slot| slot.ty).collect()
    }
}

/// A registered option and everything the parser recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionRecord {
    pub name: String,
    pub short: Option<String>,
    pub kind: OptionKind,
    pub slots: Vec<ParameterSlot>,
    pub description: Option<String>,
    /// Stored cells, seeded from the slot defaults.
    pub values: Vec<ValueCell>,
    /// Number of successful top-level matches.
    pub count: usize,
    /// Whether the option was named on the command line.
    pub user_set: bool,
}

impl OptionRecord {
    /// Builds a record from a definition, seeding one cell per slot.
    pub fn from_def(def: OptionDef) -> Self {
        let OptionDef {
            name,
            short,
            kind,
            mut slots,
            description,
        } = def;
        if kind == OptionKind::Flag && slots.is_empty() {
            slots.push(ParameterSlot::flag());
        }
        let values = slots
            .iter()
            .map(|slot| ValueCell::seed(slot.ty, slot.default.as_deref()))
            .collect();
        Self {
            name,
            short,
            kind,
            slots,
            description,
            values,
            count: 0,
            user_set: false,
        }
    }

    /// Declared slot types in order.
    pub fn signature(&self) -> Vec<ParameterType> {
        self.slots.iter().map(|slot| slot.ty).collect()
    }

    /// Integer mirrors narrowed to `i32`. Missing mirrors read as 0.
    pub fn ints(&self) -> Vec<i32> {
        // truncating narrow
        self.longs().into_iter().map(|v| v as i32).collect()
    }

    /// Integer mirrors. Missing mirrors read as 0.
    pub fn longs(&self) -> Vec<i64> {
        self.values
            .iter()
            .map(|cell| cell.as_i64().unwrap_or_default())
            .collect()
    }

    /// String mirrors, skipping null cells.
    pub fn strings(&self) -> Vec<String> {
        self.values.iter().filter_map(ValueCell::as_string).collect()
    }

    /// Boolean mirrors.
    ///
    /// If any cell has no boolean reading the whole result collapses to
    /// `[false]`.
    pub fn bools(&self) -> Vec<bool> {
        self.values
            .iter()
            .map(ValueCell::as_bool)
            .collect::<Option<Vec<_>>>()
            .unwrap_or_else(|| vec![false])
    }

    /// Decimal mirrors. Missing mirrors read as 0.
    pub fn decimals(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|cell| cell.as_decimal().unwrap_or_default())
            .collect()
    }

    pub fn int(&self) -> Result<i32, AccessError> {
        self.single(self.ints())
    }

    pub fn long(&self) -> Result<i64, AccessError> {
        self.single(self.longs())
    }

    pub fn string(&self) -> Result<String, AccessError> {
        self.single(self.strings())
    }

    pub fn bool(&self) -> Result<bool, AccessError> {
        self.single(self.bools())
    }

    pub fn decimal(&self) -> Result<f64, AccessError> {
        self.single(self.decimals())
    }

    fn single<T>(&self, mut items: Vec<T>) -> Result<T, AccessError> {
        match items.len() {
            0 => Err(AccessError::NoValue {
                option: self.name.clone(),
            }),
            1 => items.pop().ok_or_else(|| AccessError::NoValue {
                option: self.name.clone(),
            }),
            count => Err(AccessError::MultipleValues {
                option: self.name.clone(),
                count,
            }),
        }
    }
}
