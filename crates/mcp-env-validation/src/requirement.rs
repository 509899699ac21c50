// crates/mcp-env-validation/src/requirement.rs
// ============================================================================
// Module: Configuration Requirements
// Description: Declarative requirement entries and ordered requirement sets.
// Purpose: Describe what a server needs before it is allowed to start.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Requirement`] names one configuration key, how strictly it is needed,
//! and the operator-facing hints printed when it is missing. Requirements are
//! grouped into a [`RequirementSet`] that preserves declaration order so
//! validation failures are reported deterministically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Requirement Level
// ============================================================================

/// How strictly a configuration entry is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementLevel {
    /// Must resolve to a non-blank value (directly or via default).
    Required,
    /// Included when present, never an error.
    Optional,
    /// Required only while its `depends_on` entry is present.
    Conditional,
}

impl RequirementLevel {
    /// Returns a stable label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Conditional => "conditional",
        }
    }
}

// ============================================================================
// SECTION: Requirement
// ============================================================================

/// One named configuration entry to validate.
///
/// # Invariants
/// - `depends_on` is only consulted when `level` is [`RequirementLevel::Conditional`].
/// - A conditional requirement without `depends_on` behaves as optional.
/// - An empty `required_permissions` list is treated as "no permissions hint".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Lookup key in the configuration source.
    pub name: String,
    /// Human-readable purpose, shown in error messages only.
    pub description: String,
    /// Validation level.
    pub level: RequirementLevel,
    /// Fallback value used when the source yields nothing.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Reference URL shown on failure.
    #[serde(default)]
    pub setup_url: Option<String>,
    /// Ordered permission names shown on failure.
    #[serde(default)]
    pub required_permissions: Vec<String>,
    /// Name of the entry whose presence triggers a conditional requirement.
    #[serde(default)]
    pub depends_on: Option<String>,
}

impl Requirement {
    /// Creates a requirement with the given level and no hints.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        level: RequirementLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            level,
            default_value: None,
            setup_url: None,
            required_permissions: Vec::new(),
            depends_on: None,
        }
    }

    /// Creates a required entry.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, RequirementLevel::Required)
    }

    /// Creates an optional entry.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, RequirementLevel::Optional)
    }

    /// Creates a conditional entry triggered by the presence of `depends_on`.
    #[must_use]
    pub fn conditional(
        name: impl Into<String>,
        description: impl Into<String>,
        depends_on: impl Into<String>,
    ) -> Self {
        Self::new(name, description, RequirementLevel::Conditional).depends_on(depends_on)
    }

    /// Sets the fallback value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the setup URL hint.
    #[must_use]
    pub fn with_setup_url(mut self, url: impl Into<String>) -> Self {
        self.setup_url = Some(url.into());
        self
    }

    /// Sets the required permissions hint.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the dependency that triggers a conditional requirement.
    #[must_use]
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on = Some(name.into());
        self
    }
}

// ============================================================================
// SECTION: Requirement Set
// ============================================================================

/// Ordered collection of requirements keyed by name.
///
/// # Invariants
/// - Names are unique.
/// - Iteration follows declaration order; replacing an entry keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementSet {
    /// Entries in declaration order.
    entries: Vec<Requirement>,
}

impl RequirementSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a requirement, returning the entry it replaced.
    pub fn insert(&mut self, requirement: Requirement) -> Option<Requirement> {
        match self.entries.iter_mut().find(|entry| entry.name == requirement.name) {
            Some(slot) => Some(std::mem::replace(slot, requirement)),
            None => {
                self.entries.push(requirement);
                None
            }
        }
    }

    /// Returns a new set with `other` merged over `self`.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.extend(other.entries);
        self
    }

    /// Looks up a requirement by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Returns true when a requirement with `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates requirements in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.entries.iter()
    }

    /// Number of requirements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<Requirement> for RequirementSet {
    fn extend<T: IntoIterator<Item = Requirement>>(&mut self, iter: T) {
        for requirement in iter {
            self.insert(requirement);
        }
    }
}

impl FromIterator<Requirement> for RequirementSet {
    fn from_iter<T: IntoIterator<Item = Requirement>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RequirementSet {
    type IntoIter = std::vec::IntoIter<Requirement>;
    type Item = Requirement;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequirementSet {
    type IntoIter = std::slice::Iter<'a, Requirement>;
    type Item = &'a Requirement;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
