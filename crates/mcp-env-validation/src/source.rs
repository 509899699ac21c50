// crates/mcp-env-validation/src/source.rs
// ============================================================================
// Module: Configuration Sources
// Description: Key/value lookup abstractions consumed by the validator.
// Purpose: Decouple validation from how configuration is populated.
// Dependencies: dotenvy, thiserror
// ============================================================================

//! ## Overview
//! The validator only needs `name -> Option<value>`. [`ProcessEnv`] reads the
//! process environment, [`DotenvFile`] parses a `.env` file into memory
//! without touching the environment, and [`LayeredSource`] stacks two sources
//! so the environment can win over a `.env` overlay.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default `.env` filename searched from the working directory upward.
pub const DEFAULT_DOTENV_NAME: &str = ".env";

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Lookup from configuration name to an optional value.
pub trait ConfigSource {
    /// Returns the raw value for `name`, if any.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Returns the value for `name` when it is non-blank.
    fn lookup_present(&self, name: &str) -> Option<String> {
        self.lookup(name).filter(|value| !value.trim().is_empty())
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Process Environment
// ============================================================================

/// Process environment lookup. Non-unicode values are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

// ============================================================================
// SECTION: Dotenv File
// ============================================================================

/// In-memory view of a `.env` file.
///
/// # Invariants
/// - Loading never mutates the process environment.
/// - Later assignments of the same key win, matching shell semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotenvFile {
    /// Path the values were read from, when a file was found.
    path: Option<PathBuf>,
    /// Parsed key/value pairs.
    values: BTreeMap<String, String>,
}

impl DotenvFile {
    /// Loads an explicit `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the file is missing, unreadable, or malformed.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let iter = dotenvy::from_path_iter(path).map_err(|err| SourceError::Dotenv {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let values = collect_pairs(iter, &path.display().to_string())?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Searches for `.env` from the working directory upward.
    ///
    /// A missing file yields an empty overlay.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the working directory is unavailable or a
    /// file is found but cannot be parsed.
    pub fn discover() -> Result<Self, SourceError> {
        let cwd = env::current_dir().map_err(|err| SourceError::Dotenv {
            path: DEFAULT_DOTENV_NAME.to_string(),
            message: err.to_string(),
        })?;
        Self::discover_from(&cwd)
    }

    /// Searches for `.env` in `start` and its ancestors, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a file is found but cannot be parsed.
    pub fn discover_from(start: &Path) -> Result<Self, SourceError> {
        let found = start
            .ancestors()
            .map(|dir| dir.join(DEFAULT_DOTENV_NAME))
            .find(|candidate| candidate.is_file());
        match found {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Path the values were read from; `None` when no file was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no entries were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for DotenvFile {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Drains a dotenvy iterator into an ordered map.
fn collect_pairs<R: std::io::Read>(
    iter: dotenvy::Iter<R>,
    label: &str,
) -> Result<BTreeMap<String, String>, SourceError> {
    let mut values = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(|err| SourceError::Dotenv {
            path: label.to_string(),
            message: err.to_string(),
        })?;
        values.insert(key, value);
    }
    Ok(values)
}

// ============================================================================
// SECTION: Layered Source
// ============================================================================

/// Two sources stacked: `primary` wins, `fallback` fills blanks.
#[derive(Debug, Clone, Default)]
pub struct LayeredSource<P, F> {
    /// Source consulted first.
    primary: P,
    /// Source consulted when `primary` has no non-blank value.
    fallback: F,
}

impl<P, F> LayeredSource<P, F> {
    /// Stacks `primary` over `fallback`.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
        }
    }
}

impl<P: ConfigSource, F: ConfigSource> ConfigSource for LayeredSource<P, F> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.primary.lookup_present(name).or_else(|| self.fallback.lookup(name))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration source errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// `.env` file could not be read or parsed.
    #[error("failed to load {path}: {message}")]
    Dotenv {
        /// File path or name.
        path: String,
        /// Underlying parser message.
        message: String,
    },
}
