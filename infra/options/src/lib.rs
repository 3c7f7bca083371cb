//! # Options Store
//!
//! A process-wide dynamic-configuration registry. Options are declared once
//! during startup with a default value and may be overridden at runtime
//! (typically by an operator tool or a control-plane sync job).
//!
//! The store is read-mostly after startup: registration happens while the
//! application composes itself, lookups happen on request paths.
//!
//! # Example
//!
//! ```rust
//! use flagstone_options::OptionsStore;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), flagstone_options::OptionsError> {
//! let options = OptionsStore::new();
//! options.register("feature.organizations:session-replay", json!({}))?;
//!
//! assert_eq!(options.get("feature.organizations:session-replay")?, json!({}));
//!
//! options.set("feature.organizations:session-replay", json!({"rollout": 25}))?;
//! assert_eq!(options.get("feature.organizations:session-replay")?["rollout"], 25);
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

pub use error::OptionsError;
pub use store::OptionsStore;
