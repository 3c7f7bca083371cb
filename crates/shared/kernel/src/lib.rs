//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading.
//!
//! ## Config loading
//! ```rust,ignore
//! use flagstone_kernel::config::load_config;
//! let cfg = load_config::<flagstone_domain::config::AppConfig>(Some("flagstone")).unwrap();
//! ```

pub mod config;

pub use flagstone_domain as domain;
