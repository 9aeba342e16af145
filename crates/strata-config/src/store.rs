//! Document persistence for one scope at a time.
//!
//! Reads and writes the JSON document behind a [`Scope`], owns default-document
//! initialization, and hosts the document-level operations the CLI layer
//! consumes (update, import/merge, export, reset).
//!
//! Writes go through a temp file in the target directory followed by a rename,
//! so a crash mid-write never leaves a half-serialized document behind. Rename
//! atomicity holds on a single filesystem; cross-process read-modify-write
//! races remain last-writer-wins.

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::merge::{merge, merge_documents};
use crate::{ConfigDocument, ConfigError, ConfigPaths, Result, Scope};

/// Reads and writes scope-addressed configuration documents.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    paths: ConfigPaths,
}

impl ConfigStore {
    /// Create a store using the environment-derived path layout.
    pub fn new() -> Self {
        Self {
            paths: ConfigPaths::new(),
        }
    }

    /// Create a store over an explicit path layout.
    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// The path layout this store addresses.
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// First-use setup: the global directory and default file are created, the
    /// local directory is created but the local file is left to first
    /// read/write.
    pub fn ensure_initialized(&self) -> Result<()> {
        create_dir(self.paths.global_dir())?;
        let global_path = self.paths.global_path();
        if !global_path.exists() {
            debug!(path = %global_path.display(), "seeding global config with defaults");
            self.write_path(&global_path, &ConfigDocument::default_document())?;
        }
        create_dir(self.paths.local_dir())
    }

    /// Read the document for a scope.
    ///
    /// A missing global or local file springs into existence with the default
    /// document; a missing named file fails [`ConfigError::NotFound`]; a file
    /// that exists but holds invalid JSON fails [`ConfigError::Corrupt`].
    pub fn read(&self, scope: &Scope) -> Result<ConfigDocument> {
        let path = self.paths.path_for(scope);
        if !path.exists() {
            return match scope {
                Scope::File(_) => Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                }),
                Scope::Global | Scope::Local => {
                    debug!(scope = %scope, path = %path.display(), "creating config with defaults");
                    let doc = ConfigDocument::default_document();
                    self.write_path(&path, &doc)?;
                    Ok(doc)
                }
            };
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        ConfigDocument::from_json(&contents).map_err(|e| ConfigError::Corrupt {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write a document to a scope, creating parent directories as needed.
    pub fn write(&self, doc: &ConfigDocument, scope: &Scope) -> Result<()> {
        let path = self.paths.path_for(scope);
        debug!(scope = %scope, path = %path.display(), "writing config");
        self.write_path(&path, doc)
    }

    /// Deep-merge a partial JSON object onto the stored document, persist, and
    /// return the merged document.
    ///
    /// A partial that is not a JSON object, or that breaks the document shape,
    /// fails [`ConfigError::Validation`] without touching the stored file.
    pub fn update(&self, partial: &Value, scope: &Scope) -> Result<ConfigDocument> {
        if !partial.is_object() {
            return Err(ConfigError::Validation(vec![
                "configuration update must be a JSON object".to_string(),
            ]));
        }

        let current = self.read(scope)?;
        let merged = ConfigDocument::from_value(merge(&current.to_value()?, partial))?;
        self.write(&merged, scope)?;
        Ok(merged)
    }

    /// Import a source document into a destination scope.
    ///
    /// With `replace` the destination is overwritten wholesale. Otherwise the
    /// source is deep-merged over the destination's current contents; a named
    /// destination that does not exist yet is created with the source contents
    /// (import convenience — direct reads of an absent named file still fail).
    pub fn merge_into(&self, source: &ConfigDocument, dest: &Scope, replace: bool) -> Result<()> {
        if replace {
            return self.write(source, dest);
        }

        let merged = match self.read(dest) {
            Ok(existing) => merge_documents(&existing, source)?,
            Err(ConfigError::NotFound { .. }) => source.clone(),
            Err(e) => return Err(e),
        };
        self.write(&merged, dest)
    }

    /// Export a scope's document to an arbitrary file path.
    pub fn export_to(&self, scope: &Scope, dest: &Path) -> Result<()> {
        let doc = self.read(scope)?;
        debug!(scope = %scope, dest = %dest.display(), "exporting config");
        self.write_path(dest, &doc)
    }

    /// Reset a scope's document to the compiled-in defaults.
    pub fn reset(&self, scope: &Scope) -> Result<()> {
        self.write(&ConfigDocument::default_document(), scope)
    }

    /// Serialize and atomically replace the file at `path`.
    fn write_path(&self, path: &Path, doc: &ConfigDocument) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        create_dir(parent)?;

        let contents = doc.to_json()?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| ConfigError::WriteFile {
                path: path.display().to_string(),
                source: e,
            })?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteFile {
                path: path.display().to_string(),
                source: e,
            })?;
        tmp.persist(path).map_err(|e| ConfigError::WriteFile {
            path: path.display().to_string(),
            source: e.error,
        })?;
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteFile {
        path: dir.display().to_string(),
        source: e,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
