//! Configuration document model.
//!
//! The unit of persistence is a JSON document with three top-level mappings:
//!
//! ```json
//! {
//!   "profiles": { "llm": { "work": { "provider": "openai", ... } } },
//!   "defaults": { "llm": "work" },
//!   "settings": { "output_format": "json" }
//! }
//! ```
//!
//! Unknown top-level keys are tolerated and round-tripped unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConfigError, Result};

/// A single profile: a mapping from field name to scalar value.
pub type ProfileRecord = Map<String, Value>;

/// A parsed configuration document for one scope.
///
/// All sections default to empty so partial documents (e.g. a named file
/// holding only a few profiles) parse cleanly and merge on top of fuller ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Profile-type name → profile name → profile record.
    pub profiles: BTreeMap<String, BTreeMap<String, ProfileRecord>>,

    /// Profile-type name → default profile name (`None` serializes as `null`).
    pub defaults: BTreeMap<String, Option<String>>,

    /// Free-form key-value settings.
    pub settings: BTreeMap<String, Value>,

    /// Top-level keys the engine does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in default document used to seed new stores and as the
    /// reset target.
    pub fn default_document() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("llm".to_string(), BTreeMap::new());
        profiles.insert("database".to_string(), BTreeMap::new());

        let mut defaults = BTreeMap::new();
        defaults.insert("llm".to_string(), None);
        defaults.insert("database".to_string(), None);

        let mut settings = BTreeMap::new();
        settings.insert("output_format".to_string(), Value::from("json"));
        settings.insert("color_theme".to_string(), Value::from("dark"));
        settings.insert("log_level".to_string(), Value::from("info"));

        Self {
            profiles,
            defaults,
            settings,
            extra: Map::new(),
        }
    }

    /// Parse from a JSON string.
    pub fn from_json(json_str: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize to 2-space-indented JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Convert into a JSON tree for structural merging.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(ConfigError::Serialize)
    }

    /// Re-type a merged JSON tree back into a document.
    ///
    /// Fails with [`ConfigError::Validation`] when the tree no longer fits the
    /// document shape (e.g. a caller-supplied partial replaced `profiles.llm`
    /// with a scalar).
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ConfigError::Validation(vec![format!("invalid configuration: {e}")]))
    }

    /// Profiles of one type, if any exist yet.
    pub fn profiles_of(&self, profile_type: &str) -> Option<&BTreeMap<String, ProfileRecord>> {
        self.profiles.get(profile_type)
    }

    /// Mutable profiles of one type, created on first use.
    pub fn profiles_of_mut(&mut self, profile_type: &str) -> &mut BTreeMap<String, ProfileRecord> {
        self.profiles.entry(profile_type.to_string()).or_default()
    }

    /// The recorded default profile name for a type.
    pub fn default_for(&self, profile_type: &str) -> Option<&str> {
        self.defaults
            .get(profile_type)
            .and_then(|name| name.as_deref())
    }

    /// Record (or clear) the default profile name for a type.
    pub fn set_default_for(&mut self, profile_type: &str, name: Option<String>) {
        self.defaults.insert(profile_type.to_string(), name);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
