// crates/mcp-env-validation/src/validator.rs
// ============================================================================
// Module: Startup Validator
// Description: Single-pass resolution of requirements against a source.
// Purpose: Fail closed at startup with one aggregated error.
// Dependencies: crate::requirement, crate::source
// ============================================================================

//! ## Overview
//! [`validate`] walks a [`RequirementSet`] in declaration order, resolves each
//! entry from the [`ConfigSource`] (falling back to its default), and sorts it
//! into resolved, missing-required, or missing-conditional. Nothing is logged
//! and nothing is mutated; the same inputs always produce the same output.
//!
//! ## Invariants
//! - Blank (empty or whitespace-only) values are treated as absent, so a
//!   whitespace-only optional value is dropped rather than resolved.
//! - Optional entries and untriggered conditional entries never fail.
//! - A conditional entry is triggered only by a non-blank dependency value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::requirement::Requirement;
use crate::requirement::RequirementLevel;
use crate::requirement::RequirementSet;
use crate::source::ConfigSource;
use crate::source::ProcessEnv;

// ============================================================================
// SECTION: Resolved Config
// ============================================================================

/// Requirements judged present, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Resolved values.
    values: BTreeMap<String, String>,
}

impl ResolvedConfig {
    /// Returns the resolved value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true when `name` resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates resolved entries ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of resolved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the config and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.values
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates `requirements` against `source`.
///
/// # Errors
///
/// Returns [`ConfigurationError`] listing every required entry that did not
/// resolve and every triggered conditional entry that did not resolve.
pub fn validate<S: ConfigSource + ?Sized>(
    service_name: &str,
    requirements: &RequirementSet,
    source: &S,
) -> Result<ResolvedConfig, ConfigurationError> {
    let mut values = BTreeMap::new();
    let mut missing_required = Vec::new();
    let mut missing_conditional = Vec::new();

    for requirement in requirements {
        let value = resolve_value(requirement, source);
        match requirement.level {
            RequirementLevel::Required => match value {
                Some(value) => {
                    values.insert(requirement.name.clone(), value);
                }
                None => missing_required.push(requirement.clone()),
            },
            RequirementLevel::Conditional => {
                let triggered = requirement
                    .depends_on
                    .as_deref()
                    .is_some_and(|dependency| source.lookup_present(dependency).is_some());
                match value {
                    Some(value) => {
                        values.insert(requirement.name.clone(), value);
                    }
                    None if triggered => missing_conditional.push(requirement.clone()),
                    None => {}
                }
            }
            RequirementLevel::Optional => {
                if let Some(value) = value {
                    values.insert(requirement.name.clone(), value);
                }
            }
        }
    }

    if missing_required.is_empty() && missing_conditional.is_empty() {
        Ok(ResolvedConfig {
            values,
        })
    } else {
        Err(ConfigurationError::new(service_name, missing_required, missing_conditional))
    }
}

/// Validates `requirements` against the process environment.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when any requirement is unsatisfied.
pub fn validate_env(
    service_name: &str,
    requirements: &RequirementSet,
) -> Result<ResolvedConfig, ConfigurationError> {
    validate(service_name, requirements, &ProcessEnv)
}

/// Resolves a requirement's value, falling back to its non-blank default.
fn resolve_value<S: ConfigSource + ?Sized>(requirement: &Requirement, source: &S) -> Option<String> {
    source.lookup_present(&requirement.name).or_else(|| {
        requirement.default_value.clone().filter(|value| !value.trim().is_empty())
    })
}
