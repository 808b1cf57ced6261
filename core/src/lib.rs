//! Schema-driven command-line token parsing.
//!
//! This crate turns a flat token list into typed option values according to
//! a declared schema:
//!
//! - [`OptionRegistry`] — the declared options, looked up by long name or
//!   short alias, plus the default parameter and default verb.
//! - [`OptionDef`] / [`OptionRecord`] — one option's declaration and its
//!   parsed state (values, occurrence count, user-set flag).
//! - [`ValueCell`] — one coerced value with on-demand projections into the
//!   other [`ParameterType`]s.
//! - [`SchemaDocument`] — a whole registry described in JSON or YAML,
//!   checked by [`validate_document`].
//!
//! Parsing ([`OptionRegistry::parse`]) consumes tokens left to right:
//! `--name` and `-short` select options, bare tokens select verbs or fall
//! through to the default parameter. Failures are reported as tagged
//! [`ParseError`] variants.
//!
//! # Example
//!
//! ```
//! use optline_core::*;
//!
//! let mut registry = OptionRegistry::new();
//! registry
//!     .add("build", None, OptionKind::Verb, "Build the project")?
//!     .add("release", Some("r"), OptionKind::Flag, "Optimized build")?
//!     .add_single("define", Some("D"), OptionKind::MultiParameter, ParameterType::String, None, "")?
//!     .add("inputs", None, OptionKind::Unnamed, "Input files")?
//!     .set_default_parameter("inputs")
//!     .set_default_verb("help");
//!
//! registry.parse(["build", "-r", "-D", "a=1", "main.c", "-D", "b=2"])?;
//!
//! assert_eq!(registry.verbs(), vec!["build"]);
//! assert!(registry.has_flag("release")?);
//! assert_eq!(registry.strings("define"), vec!["a=1", "b=2"]);
//! assert_eq!(registry.strings("inputs"), vec!["main.c"]);
//!
//! let err = registry.parse(["--jobs", "4"]).unwrap_err();
//! assert_eq!(err, ParseError::UnknownOption { token: "--jobs".into() });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod document;
mod error;
mod parse;
mod registry;
mod types;
mod validate;
mod value;

pub use document::SchemaDocument;
pub use error::{AccessError, BuildError, CoercionError, DocumentError, ParseError};
pub use parse::{Classified, ParseSummary, TokenClass, classify};
pub use registry::{OptionRegistry, Prefixes};
pub use types::*;
pub use validate::{ValidationError, validate_document};
pub use value::{Value, ValueCell, parse_boolean, parse_decimal, parse_integer};
