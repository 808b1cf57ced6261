//! Schema document validation.
//!
//! Catches structural problems in a [`SchemaDocument`] before it is turned
//! into a registry: empty or prefixed names, duplicates, slot lists that the
//! parse loop could never fill, and defaults pointing at missing options.
//!
//! # Examples
//!
//! ```
//! use optline_core::*;
//!
//! let mut doc = SchemaDocument::default();
//! doc.options.push(OptionDef::new("verbose", OptionKind::Flag).with_short("v"));
//! assert!(validate_document(&doc).is_empty());
//!
//! // Invalid: the name carries the long prefix
//! let mut bad = SchemaDocument::default();
//! bad.options.push(OptionDef::new("--verbose", OptionKind::Flag));
//! assert!(!validate_document(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{OptionDef, OptionKind, Prefixes, SchemaDocument, is_valid_flag_slots};

/// Schema document validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Long or short prefix is empty, or both are the same.
    #[error("invalid prefixes: long '{long}', short '{short}'")]
    InvalidPrefixes { long: String, short: String },
    /// Option name is empty.
    #[error("option name cannot be empty")]
    EmptyOptionName,
    /// Short alias is present but empty.
    #[error("short name of {0} cannot be empty")]
    EmptyShortName(String),
    /// Name or short alias has leading or trailing whitespace.
    #[error("option name has surrounding whitespace: {0:?}")]
    UntrimmedName(String),
    /// Name or short alias already starts with a prefix marker.
    #[error("option name must not include a prefix: {0}")]
    PrefixedName(String),
    /// Two options share a long name.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Two options share a short alias.
    #[error("duplicate short name: {0}")]
    DuplicateShortName(String),
    /// A flag declares slots other than one boolean defaulting to false.
    #[error("flag {0} must have exactly one boolean slot defaulting to false")]
    InvalidFlagSlots(String),
    /// A verb or parameter declares more than one slot.
    #[error("{kind} {name} declares {slots} slots, at most one is allowed")]
    TooManySlots {
        name: String,
        kind: OptionKind,
        slots: usize,
    },
    /// The default parameter is not declared.
    #[error("default parameter is not declared: {0}")]
    UnknownDefaultParameter(String),
    /// The default parameter cannot hold more than one value.
    #[error("default parameter {name} is a {kind}, expected unnamed or multi_parameter")]
    DefaultParameterNotCollecting { name: String, kind: OptionKind },
    /// The default verb is not declared.
    #[error("default verb is not declared: {0}")]
    UnknownDefaultVerb(String),
    /// The default verb is declared with another kind.
    #[error("default verb {0} is not a verb")]
    DefaultVerbNotVerb(String),
}

/// Validates a schema document.
///
/// Returns the first problem found, or an empty list.
///
/// # Examples
///
/// ```
/// use optline_core::*;
///
/// let mut doc = SchemaDocument::default();
/// doc.default_verb = Some("help".into());
/// let errors = validate_document(&doc);
/// assert_eq!(errors, vec![ValidationError::UnknownDefaultVerb("help".into())]);
/// ```
pub fn validate_document(doc: &SchemaDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(err) = validate_prefixes(&doc.prefixes) {
        errors.push(err);
        return errors;
    }

    errors.extend(validate_options(&doc.options, &doc.prefixes));
    if !errors.is_empty() {
        return errors;
    }

    let find = |name: &str| doc.options.iter().find(|option| option.name == name);

    if let Some(name) = &doc.default_parameter {
        match find(name) {
            None => {
                errors.push(ValidationError::UnknownDefaultParameter(name.clone()));
                return errors;
            }
            Some(option) if !option.kind.collects_bare_tokens() => {
                errors.push(ValidationError::DefaultParameterNotCollecting {
                    name: name.clone(),
                    kind: option.kind,
                });
                return errors;
            }
            Some(_) => {}
        }
    }

    if let Some(name) = &doc.default_verb {
        match find(name) {
            None => errors.push(ValidationError::UnknownDefaultVerb(name.clone())),
            Some(option) if option.kind != OptionKind::Verb => {
                errors.push(ValidationError::DefaultVerbNotVerb(name.clone()));
            }
            Some(_) => {}
        }
    }

    errors
}

pub(crate) fn validate_prefixes(prefixes: &Prefixes) -> Option<ValidationError> {
    if prefixes.long.is_empty() || prefixes.short.is_empty() || prefixes.long == prefixes.short {
        return Some(ValidationError::InvalidPrefixes {
            long: prefixes.long.clone(),
            short: prefixes.short.clone(),
        });
    }
    None
}

fn validate_options(options: &[OptionDef], prefixes: &Prefixes) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut shorts = HashSet::new();
    let prefixed = |name: &str| name.starts_with(&prefixes.long) || name.starts_with(&prefixes.short);

    for option in options {
        let name = option.name.as_str();
        if name.is_empty() {
            errors.push(ValidationError::EmptyOptionName);
            return errors;
        }
        if name.trim() != name {
            errors.push(ValidationError::UntrimmedName(name.to_string()));
            return errors;
        }
        if prefixed(name) {
            errors.push(ValidationError::PrefixedName(name.to_string()));
            return errors;
        }
        if !names.insert(name) {
            errors.push(ValidationError::DuplicateOption(name.to_string()));
            return errors;
        }

        if let Some(short) = &option.short {
            if short.is_empty() {
                errors.push(ValidationError::EmptyShortName(name.to_string()));
                return errors;
            }
            if short.trim() != short {
                errors.push(ValidationError::UntrimmedName(short.clone()));
                return errors;
            }
            if prefixed(short) {
                errors.push(ValidationError::PrefixedName(short.clone()));
                return errors;
            }
            if !shorts.insert(short.as_str()) {
                errors.push(ValidationError::DuplicateShortName(short.clone()));
                return errors;
            }
        }

        match option.kind {
            OptionKind::Flag => {
                if !is_valid_flag_slots(&option.slots) {
                    errors.push(ValidationError::InvalidFlagSlots(name.to_string()));
                    return errors;
                }
            }
            kind if kind.is_single_valued() && option.slots.len() > 1 => {
                errors.push(ValidationError::TooManySlots {
                    name: name.to_string(),
                    kind,
                    slots: option.slots.len(),
                });
                return errors;
            }
            _ => {}
        }
    }

    errors
}
