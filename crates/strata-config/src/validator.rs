//! Per-profile-type validation and defaulting.
//!
//! Each profile type registers a static field specification plus a validator.
//! The validator runs uniform required-field checks against that
//! specification, then type-specific field rules, collecting every violation
//! before failing, and finally fills defaults for absent optional fields.
//! Create and edit go through the same path (edit validates the merged
//! record, not just the updated fields).

use serde_json::Value;

use crate::{ConfigError, ProfileRecord, Result};

/// The value shape a profile field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string value.
    Text,
    /// A numeric value.
    Number,
}

/// Static descriptor for one profile field.
///
/// Immutable after definition; drives both validation and the parameter
/// surface the CLI layer exposes.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field name as stored in the profile record.
    pub name: &'static str,
    /// Value shape.
    pub kind: FieldKind,
    /// Whether the field must be present on create/edit.
    pub required: bool,
    /// Human-readable help text.
    pub help: &'static str,
}

/// Validation strategy for one profile type.
pub trait ProfileValidator {
    /// The field specification for this profile type.
    fn field_specs(&self) -> &[FieldSpec];

    /// Type-specific field rules beyond required-field checks.
    ///
    /// Returns one message per violated rule.
    fn validate_fields(&self, _record: &ProfileRecord) -> Vec<String> {
        Vec::new()
    }

    /// Fill defaults for optional fields absent from the record.
    fn apply_defaults(&self, record: ProfileRecord) -> ProfileRecord {
        record
    }

    /// Run the full validation pipeline: required fields, field rules, then
    /// defaulting. All violations of one call are reported together.
    fn validate(&self, record: ProfileRecord) -> Result<ProfileRecord> {
        let mut errors = Vec::new();

        for spec in self.field_specs() {
            if spec.required && !record.contains_key(spec.name) {
                errors.push(format!("missing required field: {}", spec.name));
            }
        }
        errors.extend(self.validate_fields(&record));

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(self.apply_defaults(record))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LLM profiles
// ─────────────────────────────────────────────────────────────────────────────

/// Field specification for LLM provider profiles.
pub const LLM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        required: true,
        help: "Profile name",
    },
    FieldSpec {
        name: "provider",
        kind: FieldKind::Text,
        required: true,
        help: "LLM provider (e.g. openai, anthropic)",
    },
    FieldSpec {
        name: "model",
        kind: FieldKind::Text,
        required: true,
        help: "Model name",
    },
    FieldSpec {
        name: "deployment",
        kind: FieldKind::Text,
        required: false,
        help: "Deployment name (for Azure)",
    },
    FieldSpec {
        name: "api_key",
        kind: FieldKind::Text,
        required: true,
        help: "API key",
    },
    FieldSpec {
        name: "base_url",
        kind: FieldKind::Text,
        required: false,
        help: "Base URL for the API",
    },
    FieldSpec {
        name: "api_version",
        kind: FieldKind::Text,
        required: false,
        help: "API version",
    },
    FieldSpec {
        name: "temperature",
        kind: FieldKind::Number,
        required: false,
        help: "Sampling temperature (0.0-1.0)",
    },
];

/// Providers accepted by the LLM validator, with their default base URLs.
const PROVIDERS: &[(&str, &str)] = &[
    ("openai", "https://api.openai.com"),
    ("anthropic", "https://api.anthropic.com"),
    ("azure", "https://YOUR_RESOURCE_NAME.openai.azure.com"),
    ("cohere", "https://api.cohere.ai"),
];

/// Validator for the bundled `llm` profile type.
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmProfileValidator;

impl ProfileValidator for LlmProfileValidator {
    fn field_specs(&self) -> &[FieldSpec] {
        LLM_FIELDS
    }

    fn validate_fields(&self, record: &ProfileRecord) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(temperature) = record.get("temperature") {
            match temperature.as_f64() {
                Some(t) if (0.0..=1.0).contains(&t) => {}
                Some(_) => errors.push("temperature must be between 0.0 and 1.0".to_string()),
                None => errors.push("temperature must be a number".to_string()),
            }
        }

        if let Some(provider) = record.get("provider") {
            let known = provider
                .as_str()
                .is_some_and(|p| PROVIDERS.iter().any(|(name, _)| *name == p));
            if !known {
                let names: Vec<&str> = PROVIDERS.iter().map(|(name, _)| *name).collect();
                errors.push(format!("provider must be one of: {}", names.join(", ")));
            }
        }

        errors
    }

    fn apply_defaults(&self, mut record: ProfileRecord) -> ProfileRecord {
        if !record.contains_key("deployment") {
            record.insert("deployment".to_string(), Value::Null);
        }
        if !record.contains_key("base_url") {
            let base_url = record
                .get("provider")
                .and_then(Value::as_str)
                .and_then(|p| {
                    PROVIDERS
                        .iter()
                        .find(|(name, _)| *name == p)
                        .map(|(_, url)| *url)
                })
                .unwrap_or("");
            record.insert("base_url".to_string(), Value::from(base_url));
        }
        if !record.contains_key("api_version") {
            record.insert("api_version".to_string(), Value::from("v1"));
        }
        if !record.contains_key("temperature") {
            record.insert("temperature".to_string(), Value::from(0.7));
        }
        record
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spec-only profiles
// ─────────────────────────────────────────────────────────────────────────────

/// Validator with required-field checks only: no extra rules, no defaulting.
///
/// Used for profile types without field-level constraints (e.g. `database`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicProfileValidator {
    specs: &'static [FieldSpec],
}

impl BasicProfileValidator {
    /// Build a validator over a static field specification.
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self { specs }
    }
}

impl ProfileValidator for BasicProfileValidator {
    fn field_specs(&self) -> &[FieldSpec] {
        self.specs
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ProfileRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_llm_defaults_filled() {
        let validated = LlmProfileValidator
            .validate(record(json!({
                "name": "p1",
                "provider": "openai",
                "model": "gpt-4",
                "api_key": "sk-test"
            })))
            .unwrap();

        assert_eq!(validated.get("base_url"), Some(&json!("https://api.openai.com")));
        assert_eq!(validated.get("api_version"), Some(&json!("v1")));
        assert_eq!(validated.get("temperature"), Some(&json!(0.7)));
        assert_eq!(validated.get("deployment"), Some(&Value::Null));
        // Supplied fields untouched.
        assert_eq!(validated.get("model"), Some(&json!("gpt-4")));
    }

    #[test]
    fn test_llm_explicit_values_not_overwritten() {
        let validated = LlmProfileValidator
            .validate(record(json!({
                "name": "p1",
                "provider": "anthropic",
                "model": "claude-sonnet",
                "api_key": "sk-ant",
                "base_url": "https://proxy.internal",
                "temperature": 0.2
            })))
            .unwrap();

        assert_eq!(validated.get("base_url"), Some(&json!("https://proxy.internal")));
        assert_eq!(validated.get("temperature"), Some(&json!(0.2)));
    }

    #[test]
    fn test_llm_temperature_out_of_range() {
        let err = LlmProfileValidator
            .validate(record(json!({
                "name": "p1",
                "provider": "openai",
                "model": "gpt-4",
                "api_key": "sk-test",
                "temperature": 1.5
            })))
            .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("between 0.0 and 1.0")));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_llm_temperature_boundaries_accepted() {
        for t in [0.0, 1.0] {
            let validated = LlmProfileValidator
                .validate(record(json!({
                    "name": "p1",
                    "provider": "openai",
                    "model": "gpt-4",
                    "api_key": "sk-test",
                    "temperature": t
                })))
                .unwrap();
            assert_eq!(validated.get("temperature"), Some(&json!(t)));
        }
    }

    #[test]
    fn test_llm_unknown_provider() {
        let err = LlmProfileValidator
            .validate(record(json!({
                "name": "p1",
                "provider": "homegrown",
                "model": "m",
                "api_key": "k"
            })))
            .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors[0].contains("openai, anthropic, azure, cohere"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_llm_missing_required_fields_reported_together() {
        let err = LlmProfileValidator
            .validate(record(json!({"name": "p1", "temperature": 2.0})))
            .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                // provider, model, api_key missing + temperature out of range
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| e.contains("provider")));
                assert!(errors.iter().any(|e| e.contains("model")));
                assert!(errors.iter().any(|e| e.contains("api_key")));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_basic_validator_passes_through() {
        let input = record(json!({"name": "db1", "host": "localhost"}));
        let validated = BasicProfileValidator::default().validate(input.clone()).unwrap();
        assert_eq!(validated, input);
    }

    #[test]
    fn test_basic_validator_required_fields() {
        const SPECS: &[FieldSpec] = &[FieldSpec {
            name: "host",
            kind: FieldKind::Text,
            required: true,
            help: "Database host",
        }];

        let err = BasicProfileValidator::new(SPECS)
            .validate(record(json!({"name": "db1"})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
