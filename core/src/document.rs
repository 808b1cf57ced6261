//! Schema documents: a whole registry described in JSON or YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! default_parameter: files
//! default_verb: help
//! options:
//!   - name: help
//!     kind: verb
//!   - name: verbose
//!     short: v
//!     kind: flag
//!     description: Print every step
//!   - name: nums
//!     short: n
//!     kind: multi_parameter
//!     slots:
//!       - type: integer
//!   - name: files
//!     kind: unnamed
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, DocumentError};
use crate::validate::validate_document;
use crate::{OptionDef, OptionRegistry, Prefixes};

/// Serializable description of an [`OptionRegistry`].
///
/// # Examples
///
/// ```
/// use optline_core::SchemaDocument;
///
/// let doc = SchemaDocument::from_yaml_str(r#"
/// default_verb: help
/// options:
///   - name: help
///     kind: verb
///   - name: verbose
///     short: v
///     kind: flag
/// "#)?;
///
/// let mut registry = doc.into_registry()?;
/// registry.parse(["-v"])?;
/// assert_eq!(registry.verbs(), vec!["help"]);
/// assert!(registry.has_flag("verbose")?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Option that collects unmatched bare tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_parameter: Option<String>,
    /// Verb reported when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_verb: Option<String>,
    #[serde(default)]
    pub prefixes: Prefixes,
    /// Options in registration order.
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

impl SchemaDocument {
    /// Loads a document from disk.
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DocumentError::IoError) if the file cannot be
    /// read, or [`JsonError`](DocumentError::JsonError) /
    /// [`YamlError`](DocumentError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let doc: Self = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(path = %path.display(), json = is_json, "loaded schema document");
        Ok(doc)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Validates the document and builds a registry from it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Invalid`] with the first validation problem, or
    /// a registration error.
    pub fn into_registry(self) -> Result<OptionRegistry, BuildError> {
        if let Some(err) = validate_document(&self).into_iter().next() {
            return Err(BuildError::Invalid(err));
        }

        let mut registry = OptionRegistry::new().with_prefixes(self.prefixes)?;
        for def in self.options {
            registry.register(def)?;
        }
        if let Some(name) = self.default_parameter {
            registry.set_default_parameter(name);
        }
        if let Some(name) = self.default_verb {
            registry.set_default_verb(name);
        }
        debug!(options = registry.len(), "built option registry");
        Ok(registry)
    }
}
