//! Token classification and the parse loop.
//!
//! Tokens are consumed left to right from a FIFO queue. Each token is
//! classified by its prefix, resolved against the registry, and, if it names
//! an option that declares slots, followed by exactly one token per slot.
//! Bare tokens that name nothing fall through to the default parameter.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::registry::{OptionRegistry, Prefixes};
use crate::{OptionKind, OptionRecord, ValueCell};

/// How a token addressed the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    /// `--name`: resolved by long name.
    Long,
    /// `-name`: resolved by short alias.
    Short,
    /// No prefix: resolved by long name as a possible verb.
    Bare,
}

/// Result of classifying one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub class: TokenClass,
    /// Lookup key: the prefix-stripped name, or the raw token when bare.
    pub key: &'a str,
}

impl Classified<'_> {
    /// Bare tokens are candidate verbs.
    pub fn is_verb_like(&self) -> bool {
        self.class == TokenClass::Bare
    }

    pub fn is_prefixed(&self) -> bool {
        self.class != TokenClass::Bare
    }
}

/// Classifies `token`, checking the long prefix before the short one.
///
/// # Examples
///
/// ```
/// use optline_core::{Prefixes, TokenClass, classify};
///
/// let prefixes = Prefixes::default();
/// assert_eq!(classify("--out", &prefixes).class, TokenClass::Long);
/// assert_eq!(classify("-o", &prefixes).key, "o");
/// assert!(classify("build", &prefixes).is_verb_like());
/// ```
pub fn classify<'a>(token: &'a str, prefixes: &Prefixes) -> Classified<'a> {
    if let Some(key) = token.strip_prefix(prefixes.long.as_str()) {
        Classified {
            class: TokenClass::Long,
            key,
        }
    } else if let Some(key) = token.strip_prefix(prefixes.short.as_str()) {
        Classified {
            class: TokenClass::Short,
            key,
        }
    } else {
        Classified {
            class: TokenClass::Bare,
            key: token,
        }
    }
}

/// What a parse call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    /// Top-level tokens that matched an option.
    pub matched: usize,
    /// Bare tokens routed to the default parameter.
    pub unnamed: usize,
    /// Bare tokens dropped because no default parameter is configured.
    pub discarded: usize,
    /// Whether the last classified top-level token was bare.
    pub last_match_verb_like: bool,
}

impl OptionRegistry {
    /// Consumes `tokens`, updating the matched records in place.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] aborts the parse and rolls every record back to
    /// its state before the call.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::{OptionKind, OptionRegistry, ParameterType};
    ///
    /// let mut registry = OptionRegistry::new();
    /// registry
    ///     .add_single("nums", Some("n"), OptionKind::MultiParameter, ParameterType::Integer, None, "")?
    ///     .add("files", None, OptionKind::Unnamed, "")?
    ///     .set_default_parameter("files");
    ///
    /// let summary = registry.parse(["--nums", "1", "a.txt", "-n", "2"])?;
    ///
    /// assert_eq!(summary.matched, 2);
    /// assert_eq!(registry.get("nums").unwrap().longs(), vec![1, 2]);
    /// assert_eq!(registry.strings("files"), vec!["a.txt"]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<ParseSummary, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: VecDeque<String> = tokens.into_iter().map(Into::into).collect();
        let snapshot = self.snapshot();
        let result = self.run(queue);
        if let Err(err) = &result {
            debug!(error = %err, "parse failed, restoring option values");
            self.restore(snapshot);
        }
        result
    }

    fn run(&mut self, mut queue: VecDeque<String>) -> Result<ParseSummary, ParseError> {
        let sink = self.resolve_default_parameter()?;
        let mut summary = ParseSummary::default();
        let prefixes = self.prefixes().clone();
        debug!(tokens = queue.len(), "parsing command line");

        while let Some(token) = queue.pop_front() {
            let classified = classify(&token, &prefixes);
            summary.last_match_verb_like = classified.is_verb_like();

            let index = match classified.class {
                TokenClass::Short => self.index_of_short(classified.key),
                TokenClass::Long | TokenClass::Bare => self.index_of(classified.key),
            };

            match index {
                Some(index) => {
                    let record = self.record_mut(index);
                    trace!(token = %token, option = %record.name, "matched option");
                    consume(record, &mut queue)?;
                    summary.matched += 1;
                }
                None if classified.is_prefixed() => {
                    return Err(ParseError::UnknownOption { token });
                }
                None => match sink {
                    Some(index) => {
                        let record = self.record_mut(index);
                        trace!(token = %token, sink = %record.name, "routing bare token");
                        record.values.push(ValueCell::text(token));
                        summary.unnamed += 1;
                    }
                    None => {
                        trace!(token = %token, "discarding bare token");
                        summary.discarded += 1;
                    }
                },
            }
        }

        debug!(
            matched = summary.matched,
            unnamed = summary.unnamed,
            discarded = summary.discarded,
            "parse complete"
        );
        Ok(summary)
    }

    fn resolve_default_parameter(&self) -> Result<Option<usize>, ParseError> {
        match self.default_parameter() {
            None => Ok(None),
            Some(name) => {
                let index =
                    self.index_of(name)
                        .ok_or_else(|| ParseError::UnknownDefaultParameter {
                            name: name.to_string(),
                        })?;
                let kind = self.record(index).kind;
                if !kind.collects_bare_tokens() {
                    return Err(ParseError::DefaultParameterNotCollecting {
                        name: name.to_string(),
                        kind,
                    });
                }
                Ok(Some(index))
            }
        }
    }
}

/// Applies one occurrence of `record`, pulling its slot values off `queue`.
fn consume(record: &mut OptionRecord, queue: &mut VecDeque<String>) -> Result<(), ParseError> {
    record.user_set = true;

    if record.kind == OptionKind::Flag {
        if record.values.len() != 1 {
            return Err(ParseError::ValueSlotMismatch {
                option: record.name.clone(),
                cells: record.values.len(),
            });
        }
        record.values[0] = ValueCell::boolean(true);
        record.count += 1;
        return Ok(());
    }

    let signature = record.signature();
    for (slot, &expected) in signature.iter().enumerate() {
        let token = queue.pop_front().ok_or_else(|| ParseError::MissingValue {
            option: record.name.clone(),
            slot,
            expected,
        })?;
        let cell = ValueCell::parse(expected, &token).map_err(|err| {
            ParseError::TypeCoercionFailure {
                option: record.name.clone(),
                token: err.token,
                expected,
                signature: signature.clone(),
            }
        })?;
        place(record, slot, cell)?;
    }

    record.count += 1;
    Ok(())
}

/// Stores `cell` for slot `slot` according to the record's kind.
fn place(record: &mut OptionRecord, slot: usize, cell: ValueCell) -> Result<(), ParseError> {
    let mismatch = |record: &OptionRecord| ParseError::ValueSlotMismatch {
        option: record.name.clone(),
        cells: record.values.len(),
    };

    if record.kind == OptionKind::MultiParameter {
        if record.count > 0 {
            record.values.push(cell);
            return Ok(());
        }
        // first occurrence fills the seeded placeholders positionally
        if slot >= record.values.len() {
            return Err(mismatch(record));
        }
        record.values[slot] = cell;
        return Ok(());
    }

    if slot != 0 || record.values.len() != 1 {
        return Err(mismatch(record));
    }
    record.values[0] = cell;
    Ok(())
}
