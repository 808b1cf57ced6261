//! Option registry: declaration, lookup, and registry-level accessors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{AccessError, BuildError};
use crate::validate::validate_prefixes;
use crate::{
    OptionDef, OptionKind, OptionRecord, ParameterSlot, ParameterType, is_valid_flag_slots,
};

/// Markers that address an option by long or short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    #[serde(default = "default_long_prefix")]
    pub long: String,
    #[serde(default = "default_short_prefix")]
    pub short: String,
}

fn default_long_prefix() -> String {
    "--".to_string()
}

fn default_short_prefix() -> String {
    "-".to_string()
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            long: default_long_prefix(),
            short: default_short_prefix(),
        }
    }
}

/// Keyed collection of options plus the parse-time defaults.
///
/// Options keep their registration order; two hash indexes resolve long
/// names and short aliases.
///
/// # Examples
///
/// ```
/// use optline_core::{OptionKind, OptionRegistry, ParameterType};
///
/// let mut registry = OptionRegistry::new();
/// registry
///     .add("build", None, OptionKind::Verb, "Build the project")?
///     .add("verbose", Some("v"), OptionKind::Flag, "Chatty output")?
///     .add_single("jobs", Some("j"), OptionKind::Parameter, ParameterType::Integer, Some("1"), "Worker count")?;
///
/// registry.parse(["build", "-v", "--jobs", "0x10"])?;
///
/// assert_eq!(registry.verbs(), vec!["build"]);
/// assert!(registry.has_flag("verbose")?);
/// assert_eq!(registry.long("jobs")?, 16);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: Vec<OptionRecord>,
    by_name: HashMap<String, usize>,
    by_short: HashMap<String, usize>,
    default_parameter: Option<String>,
    default_verb: Option<String>,
    prefixes: Prefixes,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the long/short prefix markers.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Invalid`] if either marker is empty or both are
    /// the same.
    pub fn with_prefixes(mut self, prefixes: Prefixes) -> Result<Self, BuildError> {
        if let Some(err) = validate_prefixes(&prefixes) {
            return Err(BuildError::Invalid(err));
        }
        self.prefixes = prefixes;
        Ok(self)
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Registers a prebuilt definition.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateOptionName`] if the long name is taken
    /// and [`BuildError::DuplicateShortName`] if the short alias is. A flag
    /// whose slots are anything but one boolean defaulting to false is
    /// [`BuildError::InvalidFlagSlots`].
    pub fn register(&mut self, def: OptionDef) -> Result<&mut Self, BuildError> {
        if def.kind == OptionKind::Flag && !is_valid_flag_slots(&def.slots) {
            return Err(BuildError::InvalidFlagSlots { name: def.name });
        }
        if self.by_name.contains_key(&def.name) {
            return Err(BuildError::DuplicateOptionName { name: def.name });
        }
        if let Some(short) = &def.short {
            if let Some(&index) = self.by_short.get(short) {
                return Err(BuildError::DuplicateShortName {
                    short: short.clone(),
                    existing: self.options[index].name.clone(),
                });
            }
        }

        let record = OptionRecord::from_def(def);
        let index = self.options.len();
        trace!(name = %record.name, kind = %record.kind, slots = record.slots.len(), "registering option");
        self.by_name.insert(record.name.clone(), index);
        if let Some(short) = &record.short {
            self.by_short.insert(short.clone(), index);
        }
        self.options.push(record);
        Ok(self)
    }

    /// Adds an option with no explicit slots.
    ///
    /// Flags receive their implicit boolean slot defaulted to false.
    pub fn add(
        &mut self,
        name: &str,
        short: Option<&str>,
        kind: OptionKind,
        description: &str,
    ) -> Result<&mut Self, BuildError> {
        self.add_with_slots(name, short, kind, Vec::new(), description)
    }

    /// Adds an option with an explicit slot list.
    pub fn add_with_slots(
        &mut self,
        name: &str,
        short: Option<&str>,
        kind: OptionKind,
        slots: Vec<ParameterSlot>,
        description: &str,
    ) -> Result<&mut Self, BuildError> {
        let mut def = OptionDef::new(name, kind).with_description(description);
        def.short = short.map(String::from);
        def.slots = slots;
        self.register(def)
    }

    /// Adds an option with a single typed slot.
    pub fn add_single(
        &mut self,
        name: &str,
        short: Option<&str>,
        kind: OptionKind,
        ty: ParameterType,
        default: Option<&str>,
        description: &str,
    ) -> Result<&mut Self, BuildError> {
        let slot = ParameterSlot {
            ty,
            default: default.map(String::from),
        };
        self.add_with_slots(name, short, kind, vec![slot], description)
    }

    /// Adds an option with a single boolean slot.
    pub fn add_bool(
        &mut self,
        name: &str,
        short: Option<&str>,
        kind: OptionKind,
        default: bool,
        description: &str,
    ) -> Result<&mut Self, BuildError> {
        let default = default.to_string();
        self.add_single(
            name,
            short,
            kind,
            ParameterType::Boolean,
            Some(&default),
            description,
        )
    }

    /// Routes unmatched bare tokens to `name`.
    pub fn set_default_parameter(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_parameter = Some(name.into());
        self
    }

    pub fn default_parameter(&self) -> Option<&str> {
        self.default_parameter.as_deref()
    }

    /// Reported by [`verbs`](Self::verbs) when no verb was given.
    pub fn set_default_verb(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_verb = Some(name.into());
        self
    }

    pub fn default_verb(&self) -> Option<&str> {
        self.default_verb.as_deref()
    }

    /// Looks an option up by long name.
    pub fn get(&self, name: &str) -> Option<&OptionRecord> {
        self.by_name.get(name).map(|&index| &self.options[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut OptionRecord> {
        let index = *self.by_name.get(name)?;
        self.options.get_mut(index)
    }

    /// Looks an option up by short alias.
    pub fn get_by_short(&self, short: &str) -> Option<&OptionRecord> {
        self.by_short.get(short).map(|&index| &self.options[index])
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn index_of_short(&self, short: &str) -> Option<usize> {
        self.by_short.get(short).copied()
    }

    pub(crate) fn record(&self, index: usize) -> &OptionRecord {
        &self.options[index]
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> &mut OptionRecord {
        &mut self.options[index]
    }

    /// Copy of every record, taken before a parse so a failure can roll back.
    pub(crate) fn snapshot(&self) -> Vec<OptionRecord> {
        self.options.clone()
    }

    /// Puts back records from [`snapshot`](Self::snapshot). Indexes stay
    /// valid because registration cannot happen mid-parse.
    pub(crate) fn restore(&mut self, options: Vec<OptionRecord>) {
        self.options = options;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Options in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionRecord> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Looks an option up for an accessor.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownOption`] if nothing is registered under
    /// `name`.
    pub fn option(&self, name: &str) -> Result<&OptionRecord, AccessError> {
        self.get(name).ok_or_else(|| AccessError::UnknownOption {
            name: name.to_string(),
        })
    }

    /// Whether the flag `name` is set.
    pub fn has_flag(&self, name: &str) -> Result<bool, AccessError> {
        self.option(name)?.bool()
    }

    pub fn int(&self, name: &str) -> Result<i32, AccessError> {
        self.option(name)?.int()
    }

    pub fn long(&self, name: &str) -> Result<i64, AccessError> {
        self.option(name)?.long()
    }

    pub fn string(&self, name: &str) -> Result<String, AccessError> {
        self.option(name)?.string()
    }

    pub fn bool(&self, name: &str) -> Result<bool, AccessError> {
        self.option(name)?.bool()
    }

    pub fn decimal(&self, name: &str) -> Result<f64, AccessError> {
        self.option(name)?.decimal()
    }

    /// All string values of `name`; empty if it is not registered.
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.get(name).map(OptionRecord::strings).unwrap_or_default()
    }

    /// True if `name` is unregistered, has no string values, or its first
    /// string value is empty.
    pub fn is_parameter_null_or_empty(&self, name: &str) -> bool {
        self.strings(name).first().is_none_or(String::is_empty)
    }

    /// Negation of [`is_parameter_null_or_empty`](Self::is_parameter_null_or_empty).
    pub fn exists(&self, name: &str) -> bool {
        !self.is_parameter_null_or_empty(name)
    }

    /// Verbs named on the command line, in registration order.
    ///
    /// Falls back to the default verb, if any, when none were given.
    pub fn verbs(&self) -> Vec<&str> {
        let verbs: Vec<&str> = self
            .options
            .iter()
            .filter(|option| option.kind == OptionKind::Verb && option.user_set)
            .map(|option| option.name.as_str())
            .collect();
        if !verbs.is_empty() {
            return verbs;
        }
        self.default_verb.as_deref().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut registry = OptionRegistry::new();
        registry.add("out", Some("o"), OptionKind::Parameter, "").unwrap();

        let err = registry
            .add("out", None, OptionKind::Flag, "")
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateOptionName {
                name: "out".to_string()
            }
        );

        let err = registry
            .add("output", Some("o"), OptionKind::Flag, "")
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateShortName {
                short: "o".to_string(),
                existing: "out".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_long_and_short() {
        let mut registry = OptionRegistry::new();
        registry
            .add("verbose", Some("v"), OptionKind::Flag, "Chatty")
            .unwrap();

        assert_eq!(registry.get("verbose").unwrap().name, "verbose");
        assert_eq!(registry.get_by_short("v").unwrap().name, "verbose");
        assert!(registry.get("v").is_none());
        assert!(registry.get_by_short("verbose").is_none());
    }

    #[test]
    fn test_kind_builders_seed_expected_slots() {
        let mut registry = OptionRegistry::new();
        registry
            .add("run", None, OptionKind::Verb, "")
            .unwrap()
            .add_bool("color", None, OptionKind::Parameter, true, "")
            .unwrap()
            .add_single(
                "ratio",
                None,
                OptionKind::Parameter,
                ParameterType::Decimal,
                Some("0.5"),
                "",
            )
            .unwrap();

        assert!(registry.get("run").unwrap().slots.is_empty());
        assert_eq!(registry.bool("color"), Ok(true));
        assert_eq!(registry.decimal("ratio"), Ok(0.5));
    }

    #[test]
    fn test_null_or_empty() {
        let mut registry = OptionRegistry::new();
        registry
            .add_single("name", None, OptionKind::Parameter, ParameterType::String, None, "")
            .unwrap()
            .add_single(
                "empty",
                None,
                OptionKind::Parameter,
                ParameterType::String,
                Some(""),
                "",
            )
            .unwrap()
            .add_single(
                "set",
                None,
                OptionKind::Parameter,
                ParameterType::String,
                Some("x"),
                "",
            )
            .unwrap();

        assert!(registry.is_parameter_null_or_empty("missing"));
        assert!(registry.is_parameter_null_or_empty("name"));
        assert!(registry.is_parameter_null_or_empty("empty"));
        assert!(registry.exists("set"));
    }

    #[test]
    fn test_verbs_default_fallback() {
        let mut registry = OptionRegistry::new();
        registry.add("build", None, OptionKind::Verb, "").unwrap();
        assert!(registry.verbs().is_empty());

        registry.set_default_verb("help");
        assert_eq!(registry.verbs(), vec!["help"]);
    }

    #[test]
    fn test_has_flag_on_unknown_option() {
        let registry = OptionRegistry::new();
        assert_eq!(
            registry.has_flag("nope"),
            Err(AccessError::UnknownOption {
                name: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_flag_rejects_non_false_slots() {
        let mut registry = OptionRegistry::new();

        let err = registry
            .add_bool("quiet", Some("q"), OptionKind::Flag, true, "")
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidFlagSlots {
                name: "quiet".to_string()
            }
        );

        let err = registry
            .add_with_slots(
                "loud",
                None,
                OptionKind::Flag,
                vec![ParameterSlot::with_default(ParameterType::Integer, "7")],
                "",
            )
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidFlagSlots {
                name: "loud".to_string()
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_flag_accepts_explicit_false_slot() {
        let mut registry = OptionRegistry::new();
        registry
            .add_bool("quiet", Some("q"), OptionKind::Flag, false, "")
            .unwrap()
            .add_with_slots(
                "loud",
                None,
                OptionKind::Flag,
                vec![ParameterSlot::new(ParameterType::Boolean)],
                "",
            )
            .unwrap();

        assert_eq!(registry.has_flag("quiet"), Ok(false));
        assert_eq!(registry.has_flag("loud"), Ok(false));
    }

    #[test]
    fn test_with_prefixes_rejects_unusable_markers() {
        let err = OptionRegistry::new()
            .with_prefixes(Prefixes {
                long: String::new(),
                short: "-".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Invalid(ValidationError::InvalidPrefixes { .. })
        ));

        let registry = OptionRegistry::new()
            .with_prefixes(Prefixes {
                long: "/".to_string(),
                short: "+".to_string(),
            })
            .unwrap();
        assert_eq!(registry.prefixes().long, "/");
    }
}
