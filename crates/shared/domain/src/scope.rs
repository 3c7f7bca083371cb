//! Feature naming conventions: scope prefixes and handler strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name prefix of organization-scoped features.
pub const ORGANIZATION_PREFIX: &str = "organizations:";
/// Name prefix of project-scoped features.
pub const PROJECT_PREFIX: &str = "projects:";
/// Name prefix of user-scoped features.
pub const USER_PREFIX: &str = "users:";

/// The kind of entity a feature is checked against, derived from its name prefix.
///
/// Names without a recognized prefix are system-wide toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureScope {
    Organization,
    Project,
    User,
    System,
}

impl FeatureScope {
    /// Derive the scope of a feature from its name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if name.starts_with(ORGANIZATION_PREFIX) {
            Self::Organization
        } else if name.starts_with(PROJECT_PREFIX) {
            Self::Project
        } else if name.starts_with(USER_PREFIX) {
            Self::User
        } else {
            Self::System
        }
    }
}

impl fmt::Display for FeatureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Organization => "organization",
            Self::Project => "project",
            Self::User => "user",
            Self::System => "system",
        };
        f.write_str(s)
    }
}

/// The mechanism by which a feature's value is ultimately sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStrategy {
    /// Resolved through the statically configured default.
    Internal,
    /// Resolved by the entity handler of a remote evaluation service.
    Remote,
    /// Resolved through a dynamic-configuration option.
    Options,
    /// Resolved by the external flag service.
    FlagService,
}

impl FeatureStrategy {
    /// True for strategies whose values are sourced outside the process.
    ///
    /// Externally flagged features get a companion dynamic-configuration
    /// option registered alongside them.
    #[must_use]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::Remote | Self::FlagService)
    }
}

/// Shim for the legacy boolean registration flag.
impl From<bool> for FeatureStrategy {
    fn from(entity_backed: bool) -> Self {
        if entity_backed { Self::Remote } else { Self::Internal }
    }
}

impl fmt::Display for FeatureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Internal => "internal",
            Self::Remote => "remote",
            Self::Options => "options",
            Self::FlagService => "flag-service",
        };
        f.write_str(s)
    }
}
