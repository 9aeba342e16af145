//! Configuration scopes and filesystem path layout.
//!
//! A scope selects which document an operation targets:
//! - `global` — `~/.strata/config.json`
//! - `local` — `./.strata/config.json`
//! - `file` — a caller-supplied path, `~`-expanded
//!
//! The scope itself is never persisted.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result};

/// Directory name holding the config file, under home and under the cwd.
const APP_DIR: &str = ".strata";

/// Config filename within the app directory.
const CONFIG_FILE: &str = "config.json";

/// Environment variable to override the global config directory.
///
/// Useful for testing and running multiple instances with different configs.
const CONFIG_DIR_ENV: &str = "STRATA_CONFIG_DIR";

/// A resolved configuration scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// User-wide config under the home directory.
    Global,
    /// Project config under the current working directory.
    Local,
    /// An explicit named config file.
    File(PathBuf),
}

impl Scope {
    /// The scope token as used in CLI flags and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
            Scope::File(_) => "file",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve an optional scope token and optional file path into a [`Scope`].
///
/// Rules, in order:
/// 1. An explicit `scope` wins (`file` requires `file_path`).
/// 2. A bare `file_path` implies the `file` scope.
/// 3. Otherwise `local`.
pub fn resolve_scope(scope: Option<&str>, file_path: Option<&str>) -> Result<Scope> {
    match scope {
        Some("global") => Ok(Scope::Global),
        Some("local") => Ok(Scope::Local),
        Some("file") => match file_path {
            Some(path) => Ok(Scope::File(expand_path(Path::new(path)))),
            None => Err(ConfigError::InvalidScope(
                "scope 'file' requires a file path".to_string(),
            )),
        },
        Some(other) => Err(ConfigError::InvalidScope(other.to_string())),
        None => match file_path {
            Some(path) => Ok(Scope::File(expand_path(Path::new(path)))),
            None => Ok(Scope::Local),
        },
    }
}

/// Expand ~ to the home directory in paths.
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

// ─────────────────────────────────────────────────────────────────────────────
// Path layout
// ─────────────────────────────────────────────────────────────────────────────

/// Concrete filesystem locations for the global and local scopes.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    global_dir: PathBuf,
    local_dir: PathBuf,
}

impl ConfigPaths {
    /// Resolve paths from the environment: `STRATA_CONFIG_DIR` override, then
    /// the home directory for global, and the current working directory for
    /// local.
    pub fn new() -> Self {
        let global_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        };
        let local_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            global_dir,
            local_dir,
        }
    }

    /// Build paths from explicit home and working directories.
    pub fn with_roots(home: &Path, cwd: &Path) -> Self {
        Self {
            global_dir: home.join(APP_DIR),
            local_dir: cwd.join(APP_DIR),
        }
    }

    /// Directory holding the global config file.
    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    /// Directory holding the local config file.
    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Path to the global config file.
    pub fn global_path(&self) -> PathBuf {
        self.global_dir.join(CONFIG_FILE)
    }

    /// Path to the local config file.
    pub fn local_path(&self) -> PathBuf {
        self.local_dir.join(CONFIG_FILE)
    }

    /// The config file path for a scope.
    pub fn path_for(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Global => self.global_path(),
            Scope::Local => self.local_path(),
            Scope::File(path) => path.clone(),
        }
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
