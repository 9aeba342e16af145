//! Layered configuration and named-profile engine for the strata CLI.
//!
//! Provides JSON-based configuration with:
//! - Three document scopes: global (`~/.strata/config.json`), local
//!   (`./.strata/config.json`), and arbitrary named files
//! - Deterministic deep-merge layering (global → local → named)
//! - Named profiles per type (`profiles.llm.<name>`, etc.) with per-type
//!   validation, defaulting, and default-profile tracking
//! - Document import/export/merge across scopes
//!
//! The engine exposes plain data operations and never prints; CLI commands
//! collect arguments, call in, and render the returned structures or errors.

pub mod document;
pub mod error;
pub mod merge;
pub mod profile;
pub mod runtime;
pub mod scope;
pub mod store;
pub mod validator;

pub use document::{ConfigDocument, ProfileRecord};
pub use error::{ConfigError, Result};
pub use merge::{merge, merge_documents};
pub use profile::ProfileManager;
pub use runtime::{RuntimeContext, RuntimeOptions};
pub use scope::{expand_path, resolve_scope, ConfigPaths, Scope};
pub use store::ConfigStore;
pub use validator::{
    BasicProfileValidator, FieldKind, FieldSpec, LlmProfileValidator, ProfileValidator, LLM_FIELDS,
};
