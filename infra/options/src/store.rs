use crate::error::OptionsError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
struct OptionEntry {
    default: Value,
    value: Option<Value>,
}

/// A thread-safe registry of dynamic-configuration options.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct OptionsStore {
    inner: Arc<RwLock<FxHashMap<String, OptionEntry>>>,
}

impl OptionsStore {
    /// Creates a new, empty `OptionsStore`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option with its default value.
    ///
    /// Re-registering with the same default is a no-op; a conflicting default
    /// is a programming error surfaced at startup.
    ///
    /// # Errors
    /// Returns [`OptionsError::AlreadyRegistered`] when the name exists with
    /// a different default.
    pub fn register(&self, name: impl Into<String>, default: Value) -> Result<(), OptionsError> {
        let name = name.into();
        let mut options = self.inner.write();
        if let Some(existing) = options.get(&name) {
            if existing.default == default {
                return Ok(());
            }
            return Err(OptionsError::AlreadyRegistered { name: name.into() });
        }

        trace!(option = %name, "Registering option");
        options.insert(name, OptionEntry { default, value: None });
        Ok(())
    }

    /// Returns the current value of an option: the runtime override if one
    /// was set, the registered default otherwise.
    ///
    /// # Errors
    /// Returns [`OptionsError::UnknownOption`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<Value, OptionsError> {
        let options = self.inner.read();
        let entry = options
            .get(name)
            .ok_or_else(|| OptionsError::UnknownOption { name: name.to_owned().into() })?;
        Ok(entry.value.clone().unwrap_or_else(|| entry.default.clone()))
    }

    /// Overrides the value of a registered option.
    ///
    /// # Errors
    /// Returns [`OptionsError::UnknownOption`] for unregistered names.
    pub fn set(&self, name: &str, value: Value) -> Result<(), OptionsError> {
        let mut options = self.inner.write();
        let entry = options
            .get_mut(name)
            .ok_or_else(|| OptionsError::UnknownOption { name: name.to_owned().into() })?;
        trace!(option = %name, "Overriding option");
        entry.value = Some(value);
        Ok(())
    }

    /// Removes a runtime override, reverting the option to its default.
    ///
    /// # Errors
    /// Returns [`OptionsError::UnknownOption`] for unregistered names.
    pub fn unset(&self, name: &str) -> Result<(), OptionsError> {
        let mut options = self.inner.write();
        let entry = options
            .get_mut(name)
            .ok_or_else(|| OptionsError::UnknownOption { name: name.to_owned().into() })?;
        entry.value = None;
        Ok(())
    }

    /// Whether an option with this name has been registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// Number of registered options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the store has no registered options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
