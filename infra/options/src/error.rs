use std::borrow::Cow;

/// Errors that can occur during option store operations.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Lookup or override of an option that was never registered.
    #[error("Unknown option: {name}")]
    UnknownOption { name: Cow<'static, str> },

    /// A second registration for the same name carried a different default.
    #[error("Option already registered with a different default: {name}")]
    AlreadyRegistered { name: Cow<'static, str> },
}
