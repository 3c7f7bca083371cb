//! # Feature Flags
//!
//! The feature-flag registry and evaluation engine: named boolean capability
//! toggles scoped to an organization, project, or user by naming convention.
//!
//! ## Overview
//!
//! A [`FeatureManager`] is built by the composition root, populated with
//! feature registrations and handlers during startup, and then shared
//! immutably with request-handling code. A check walks registered
//! [`FeatureHandler`]s in order, then the [`EntityFeatureHandler`], then the
//! static default. Evaluation errors never escape the `has` family: they are
//! logged and converted to a fail-closed `false` at the public boundary.
//!
//! ## Features
//!
//! * **Ordered handler cascade**: first opinionated result wins.
//! * **Batch evaluation**: one feature across many same-organization projects.
//! * **Companion options**: externally flagged features register a
//!   `feature.<name>` dynamic-configuration option.
//! * **Telemetry**: per-check latency histogram and result counter.
//!
//! # Example
//!
//! ```rust
//! use flagstone_domain::context::Organization;
//! use flagstone_domain::scope::FeatureStrategy;
//! use flagstone_flags::{FeatureContext, FeatureManager};
//!
//! # fn main() -> Result<(), flagstone_flags::FlagError> {
//! let mut features = FeatureManager::builder().build();
//! features.add("organizations:session-replay", FeatureStrategy::Internal, true)?;
//!
//! let acme = Organization::new(1, "acme");
//! assert!(features.has("organizations:session-replay", FeatureContext::Organization(&acme), None));
//! # Ok(())
//! # }
//! ```

mod batch;
mod error;
mod feature;
mod handler;
mod manager;

pub use batch::FeatureCheckBatch;
pub use error::FlagError;
pub use feature::{Feature, FeatureContext};
pub use handler::{BatchAnswers, EntityFeatureHandler, FeatureHandler, ScopedResults};
pub use manager::{FLAG_OPTION_PREFIX, FeatureEntry, FeatureManager, FeatureManagerBuilder};
