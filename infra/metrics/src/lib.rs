//! # Flag Metrics
//!
//! Prometheus collectors emitted by the feature-flag evaluation path:
//!
//! * `features_has_duration_seconds` — histogram of single-check latency,
//!   labeled by feature name.
//! * `feature_has_result_total` — counter of check outcomes, labeled by
//!   feature name and result.
//!
//! The collectors are registered against a caller-owned [`Registry`]; this
//! crate never touches the global prometheus registry.
//!
//! # Example
//!
//! ```rust
//! use flagstone_metrics::FlagMetrics;
//! use prometheus::Registry;
//!
//! # fn main() -> Result<(), flagstone_metrics::MetricsError> {
//! let registry = Registry::new();
//! let metrics = FlagMetrics::new(&registry)?;
//!
//! let timer = metrics.start_has("organizations:session-replay");
//! metrics.record_result("organizations:session-replay", true);
//! drop(timer);
//! # Ok(())
//! # }
//! ```

use prometheus::{HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts, Registry};
use std::fmt;

/// Errors that can occur while building or registering collectors.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// The collectors backing feature-check telemetry.
///
/// Cloning is cheap; clones observe into the same collectors.
#[derive(Clone)]
pub struct FlagMetrics {
    has_duration: HistogramVec,
    has_result: IntCounterVec,
}

impl FlagMetrics {
    /// Builds the collectors and registers them with `registry`.
    ///
    /// # Errors
    /// Returns [`MetricsError::Prometheus`] if a collector with the same
    /// name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, MetricsError> {
        let has_duration = HistogramVec::new(
            HistogramOpts::new(
                "features_has_duration_seconds",
                "Time spent answering a single feature check",
            ),
            &["feature"],
        )?;
        let has_result = IntCounterVec::new(
            Opts::new("feature_has_result_total", "Outcomes of feature checks"),
            &["feature", "result"],
        )?;

        registry.register(Box::new(has_duration.clone()))?;
        registry.register(Box::new(has_result.clone()))?;

        Ok(Self { has_duration, has_result })
    }

    /// Starts the latency timer for one feature check. The observation is
    /// recorded when the returned timer drops.
    #[must_use]
    pub fn start_has(&self, feature: &str) -> HistogramTimer {
        self.has_duration.with_label_values(&[feature]).start_timer()
    }

    /// Counts the outcome of one feature check.
    pub fn record_result(&self, feature: &str, result: bool) {
        let result = if result { "true" } else { "false" };
        self.has_result.with_label_values(&[feature, result]).inc();
    }
}

impl fmt::Debug for FlagMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagMetrics").finish_non_exhaustive()
    }
}
