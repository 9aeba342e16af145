//! Per-invocation runtime context.
//!
//! Composes the store, scope resolution, and the merge engine into one
//! effective view: global, local, and (optionally) named documents loaded
//! once, merged in fixed precedence order, and cached for the duration of a
//! single invocation. Constructed explicitly from CLI-supplied arguments and
//! passed by reference to every operation; there is no ambient global state.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::merge::merge_documents;
use crate::scope::{expand_path, resolve_scope};
use crate::{ConfigDocument, ConfigError, ConfigStore, ProfileRecord, Result, Scope};

/// CLI-supplied arguments the context is constructed from.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Explicit scope token (`global`, `local`, `file`), if given.
    pub scope: Option<String>,
    /// Named config file path, if given.
    pub file_path: Option<String>,
    /// Verbose output requested.
    pub verbose: bool,
    /// Quiet output requested.
    pub quiet: bool,
}

/// Loaded configuration layers plus the merged effective view.
///
/// Configuration is best-effort at this layer: corrupt global or local
/// documents fall back to the compiled-in defaults with a warning instead of
/// aborting construction, and an absent named file only errors on explicit
/// read or save.
#[derive(Debug)]
pub struct RuntimeContext {
    store: ConfigStore,
    global: ConfigDocument,
    local: ConfigDocument,
    named: Option<ConfigDocument>,
    named_path: Option<PathBuf>,
    effective: ConfigDocument,
    current_scope: Scope,
    warnings: Vec<String>,
    verbose: bool,
    quiet: bool,
}

impl RuntimeContext {
    /// Build a context over the environment-derived path layout.
    pub fn new(options: RuntimeOptions) -> Result<Self> {
        Self::with_store(ConfigStore::new(), options)
    }

    /// Build a context over an explicit store.
    pub fn with_store(store: ConfigStore, options: RuntimeOptions) -> Result<Self> {
        let current_scope = resolve_scope(options.scope.as_deref(), options.file_path.as_deref())?;
        store.ensure_initialized()?;

        let mut warnings = Vec::new();
        let global = load_or_default(&store, &Scope::Global, &mut warnings)?;
        let local = load_or_default(&store, &Scope::Local, &mut warnings)?;

        let (named, named_path) = match options.file_path.as_deref() {
            Some(raw) => {
                let path = expand_path(Path::new(raw));
                let named = load_named(&store, &path, &mut warnings)?;
                (named, Some(path))
            }
            None => (None, None),
        };

        let mut context = Self {
            store,
            global,
            local,
            named,
            named_path,
            effective: ConfigDocument::new(),
            current_scope,
            warnings,
            verbose: options.verbose,
            quiet: options.quiet,
        };
        context.rebuild_effective()?;
        context.check_plaintext_keys();
        Ok(context)
    }

    /// The document loaded for a scope.
    ///
    /// Fails [`ConfigError::NotFound`] for the file scope when no named
    /// document was loaded.
    pub fn document(&self, scope: &Scope) -> Result<&ConfigDocument> {
        match scope {
            Scope::Global => Ok(&self.global),
            Scope::Local => Ok(&self.local),
            Scope::File(path) => self.named.as_ref().ok_or_else(|| ConfigError::NotFound {
                path: path.display().to_string(),
            }),
        }
    }

    /// Write a document through the store and rebuild the effective view.
    pub fn save_document(&mut self, doc: ConfigDocument, scope: &Scope) -> Result<()> {
        self.store.write(&doc, scope)?;
        self.cache_document(doc, scope);
        self.rebuild_effective()
    }

    /// Deep-merge a partial JSON object onto a scope's stored document,
    /// persist it, rebuild the effective view, and return the merged document.
    pub fn update_document(&mut self, partial: &Value, scope: &Scope) -> Result<ConfigDocument> {
        let merged = self.store.update(partial, scope)?;
        self.cache_document(merged.clone(), scope);
        self.rebuild_effective()?;
        Ok(merged)
    }

    /// The merged effective configuration (global ⊕ local ⊕ named).
    pub fn effective(&self) -> &ConfigDocument {
        &self.effective
    }

    /// The scope considered current for display purposes: the explicit CLI
    /// scope if given, else `file` when a named path was supplied, else
    /// `local`.
    pub fn current_scope(&self) -> &Scope {
        &self.current_scope
    }

    /// Path of the named config file, when one was supplied.
    pub fn named_path(&self) -> Option<&Path> {
        self.named_path.as_deref()
    }

    /// Warnings accumulated while loading (corrupt layers, plaintext keys).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The underlying store, for profile managers and document operations.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Whether verbose output was requested.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether quiet output was requested.
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// A setting value from the effective configuration.
    pub fn setting(&self, name: &str) -> Option<&Value> {
        self.effective.settings.get(name)
    }

    /// Set a setting in one scope and rebuild the effective view.
    pub fn set_setting(&mut self, name: &str, value: Value, scope: &Scope) -> Result<()> {
        let mut doc = self.document(scope)?.clone();
        doc.settings.insert(name.to_string(), value);
        self.save_document(doc, scope)
    }

    /// A profile from the effective configuration.
    pub fn profile(&self, profile_type: &str, name: &str) -> Result<&ProfileRecord> {
        self.effective
            .profiles_of(profile_type)
            .and_then(|entries| entries.get(name))
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile_type: profile_type.to_string(),
                name: name.to_string(),
            })
    }

    /// Profiles of a type, from one scope or from the effective view.
    pub fn profiles(
        &self,
        profile_type: &str,
        scope: Option<&Scope>,
    ) -> Result<std::collections::BTreeMap<String, ProfileRecord>> {
        let doc = match scope {
            Some(scope) => self.document(scope)?,
            None => &self.effective,
        };
        Ok(doc.profiles_of(profile_type).cloned().unwrap_or_default())
    }

    /// The effective default profile name for a type.
    pub fn default_profile(&self, profile_type: &str) -> Option<&str> {
        self.effective.default_for(profile_type)
    }

    fn cache_document(&mut self, doc: ConfigDocument, scope: &Scope) {
        match scope {
            Scope::Global => self.global = doc,
            Scope::Local => self.local = doc,
            Scope::File(path) => {
                self.named = Some(doc);
                self.named_path = Some(path.clone());
            }
        }
    }

    /// Rebuild the effective view: defaults ⊕ global ⊕ local ⊕ named.
    fn rebuild_effective(&mut self) -> Result<()> {
        let mut effective = merge_documents(&ConfigDocument::default_document(), &self.global)?;
        effective = merge_documents(&effective, &self.local)?;
        if let Some(ref named) = self.named {
            effective = merge_documents(&effective, named)?;
        }
        debug!(named = self.named.is_some(), "rebuilt effective configuration");
        self.effective = effective;
        Ok(())
    }

    /// Warn about LLM profiles carrying plaintext API keys.
    fn check_plaintext_keys(&mut self) {
        let Some(entries) = self.effective.profiles_of("llm") else {
            return;
        };
        for (name, record) in entries {
            let has_key = record
                .get("api_key")
                .and_then(Value::as_str)
                .is_some_and(|key| !key.is_empty());
            if has_key {
                self.warnings.push(format!(
                    "LLM profile '{name}' stores a plaintext API key. \
                     Consider an environment variable instead."
                ));
            }
        }
    }
}

/// Load a global/local layer, falling back to defaults when corrupt.
fn load_or_default(
    store: &ConfigStore,
    scope: &Scope,
    warnings: &mut Vec<String>,
) -> Result<ConfigDocument> {
    match store.read(scope) {
        Ok(doc) => Ok(doc),
        Err(ConfigError::Corrupt { path, .. }) => {
            warnings.push(format!("Failed to load {path}: invalid JSON, using defaults"));
            Ok(ConfigDocument::default_document())
        }
        Err(e) => Err(e),
    }
}

/// Load the named layer; absence and corruption both leave it unloaded.
fn load_named(
    store: &ConfigStore,
    path: &Path,
    warnings: &mut Vec<String>,
) -> Result<Option<ConfigDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    match store.read(&Scope::File(path.to_path_buf())) {
        Ok(doc) => Ok(Some(doc)),
        Err(ConfigError::Corrupt { path, .. }) => {
            warnings.push(format!("Failed to load {path}: invalid JSON, ignoring"));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
