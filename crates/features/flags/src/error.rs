use flagstone_domain::scope::FeatureScope;
use flagstone_options::OptionsError;
use std::borrow::Cow;

/// Errors produced by feature registration and evaluation.
///
/// Only [`FeatureManager::get`](crate::FeatureManager::get) and the
/// registration methods propagate these; the `has` family converts them to a
/// fail-closed `false` at the public boundary.
#[derive(Debug, thiserror::Error)]
pub enum FlagError {
    /// A check or lookup referenced a name that was never registered.
    #[error("Feature is not registered: {0}")]
    NotRegistered(String),

    /// Disallowed registration combination; raised at startup, never at request time.
    #[error("Invalid registration for `{name}`: {reason}")]
    InvalidRegistration { name: String, reason: Cow<'static, str> },

    /// The context passed to a check does not match the feature's registered scope.
    #[error("Feature `{name}` expects {expected} context, got {actual}")]
    ContextMismatch { name: String, expected: FeatureScope, actual: FeatureScope },

    /// A handler failed while evaluating a feature.
    #[error("Handler failed while checking `{name}`: {message}")]
    Handler { name: String, message: Cow<'static, str> },

    /// The dynamic-options store rejected a companion-option operation.
    #[error(transparent)]
    Options(#[from] OptionsError),
}
