//! Profile CRUD over a single scope's document.
//!
//! One generic manager parameterized by a profile-type identifier and a
//! validator strategy, instead of one subclass per profile type. Every
//! mutating operation is a read-modify-write of the whole containing document
//! through [`ConfigStore`]; there is no partial-field persistence.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::validator::{BasicProfileValidator, LlmProfileValidator, ProfileValidator};
use crate::{ConfigError, ConfigStore, ProfileRecord, Result, Scope};

/// CRUD operations for one profile type.
#[derive(Debug, Clone)]
pub struct ProfileManager<V: ProfileValidator> {
    profile_type: String,
    validator: V,
}

impl ProfileManager<LlmProfileValidator> {
    /// Manager for the bundled `llm` profile type.
    pub fn llm() -> Self {
        Self::new("llm", LlmProfileValidator)
    }
}

impl ProfileManager<BasicProfileValidator> {
    /// Manager for the bundled `database` profile type.
    pub fn database() -> Self {
        Self::new("database", BasicProfileValidator::default())
    }
}

impl<V: ProfileValidator> ProfileManager<V> {
    /// Build a manager for a profile type with its validation strategy.
    pub fn new(profile_type: impl Into<String>, validator: V) -> Self {
        Self {
            profile_type: profile_type.into(),
            validator,
        }
    }

    /// The profile-type identifier this manager operates on.
    pub fn profile_type(&self) -> &str {
        &self.profile_type
    }

    /// The validator's field specification, for parameter surfaces.
    pub fn field_specs(&self) -> &[crate::FieldSpec] {
        self.validator.field_specs()
    }

    /// Create a profile in a scope.
    ///
    /// The record must carry a non-empty `name` that is not already taken
    /// within this type and scope. Returns the stored record with defaults
    /// applied. A failed attempt leaves the stored document untouched.
    pub fn create(
        &self,
        store: &ConfigStore,
        record: ProfileRecord,
        scope: &Scope,
    ) -> Result<ProfileRecord> {
        let name = profile_name(&record)?;
        let validated = self.validator.validate(record)?;

        let mut doc = store.read(scope)?;
        let entries = doc.profiles_of_mut(&self.profile_type);
        if entries.contains_key(&name) {
            return Err(ConfigError::DuplicateProfile {
                profile_type: self.profile_type.clone(),
                name,
            });
        }
        entries.insert(name.clone(), validated.clone());
        store.write(&doc, scope)?;

        debug!(profile_type = %self.profile_type, name = %name, scope = %scope, "created profile");
        Ok(validated)
    }

    /// All profiles of this type in a scope; empty if none exist yet.
    pub fn list(
        &self,
        store: &ConfigStore,
        scope: &Scope,
    ) -> Result<BTreeMap<String, ProfileRecord>> {
        let doc = store.read(scope)?;
        Ok(doc
            .profiles_of(&self.profile_type)
            .cloned()
            .unwrap_or_default())
    }

    /// Look up one profile by name.
    pub fn get(&self, store: &ConfigStore, name: &str, scope: &Scope) -> Result<ProfileRecord> {
        let doc = store.read(scope)?;
        doc.profiles_of(&self.profile_type)
            .and_then(|entries| entries.get(name))
            .cloned()
            .ok_or_else(|| self.not_found(name))
    }

    /// Shallow-merge `updates` over an existing profile, re-validate the
    /// merged record, persist, and return it.
    pub fn edit(
        &self,
        store: &ConfigStore,
        name: &str,
        updates: ProfileRecord,
        scope: &Scope,
    ) -> Result<ProfileRecord> {
        let mut doc = store.read(scope)?;
        let mut merged = doc
            .profiles_of(&self.profile_type)
            .and_then(|entries| entries.get(name))
            .cloned()
            .ok_or_else(|| self.not_found(name))?;
        for (key, value) in updates {
            merged.insert(key, value);
        }

        let validated = self.validator.validate(merged)?;
        doc.profiles_of_mut(&self.profile_type)
            .insert(name.to_string(), validated.clone());
        store.write(&doc, scope)?;

        debug!(profile_type = %self.profile_type, name = %name, scope = %scope, "edited profile");
        Ok(validated)
    }

    /// Delete a profile; a default pointing at it is cleared in the same
    /// write.
    pub fn delete(&self, store: &ConfigStore, name: &str, scope: &Scope) -> Result<()> {
        let mut doc = store.read(scope)?;
        let removed = doc
            .profiles_of_mut(&self.profile_type)
            .remove(name)
            .is_some();
        if !removed {
            return Err(self.not_found(name));
        }
        if doc.default_for(&self.profile_type) == Some(name) {
            doc.set_default_for(&self.profile_type, None);
        }
        store.write(&doc, scope)?;

        debug!(profile_type = %self.profile_type, name = %name, scope = %scope, "deleted profile");
        Ok(())
    }

    /// Record a profile as the default for its type in a scope.
    ///
    /// The profile must currently exist in that scope.
    pub fn set_default(&self, store: &ConfigStore, name: &str, scope: &Scope) -> Result<()> {
        let mut doc = store.read(scope)?;
        let exists = doc
            .profiles_of(&self.profile_type)
            .is_some_and(|entries| entries.contains_key(name));
        if !exists {
            return Err(self.not_found(name));
        }
        doc.set_default_for(&self.profile_type, Some(name.to_string()));
        store.write(&doc, scope)
    }

    /// The recorded default profile name for this type in a scope, if any.
    pub fn get_default(&self, store: &ConfigStore, scope: &Scope) -> Result<Option<String>> {
        let doc = store.read(scope)?;
        Ok(doc.default_for(&self.profile_type).map(String::from))
    }

    /// Parse caller-supplied profile input: either a JSON object or a bare
    /// profile-name reference.
    ///
    /// Input that parses as JSON but is not an object fails `Validation`;
    /// input that does not parse as JSON at all is treated as a name.
    pub fn parse_record_input(&self, input: &str) -> Result<ProfileRecord> {
        match serde_json::from_str::<Value>(input) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => Err(ConfigError::Validation(vec![
                "profile input must be a JSON object or a profile name".to_string(),
            ])),
            Err(_) => {
                let mut record = ProfileRecord::new();
                record.insert("name".to_string(), Value::from(input));
                Ok(record)
            }
        }
    }

    fn not_found(&self, name: &str) -> ConfigError {
        ConfigError::ProfileNotFound {
            profile_type: self.profile_type.clone(),
            name: name.to_string(),
        }
    }
}

/// Extract a non-empty profile name from a record.
fn profile_name(record: &ProfileRecord) -> Result<String> {
    match record.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ConfigError::Validation(vec![
            "profile must have a name".to_string(),
        ])),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
