use crate::batch::FeatureCheckBatch;
use crate::error::FlagError;
use crate::feature::Feature;
use flagstone_domain::context::{Organization, Project, ProjectId, User};
use fxhash::FxHashMap;

/// Per-project answers from a batch handler. `None` leaves the project for
/// the next mechanism.
pub type BatchAnswers = FxHashMap<ProjectId, Option<bool>>;

/// Multi-feature results keyed by scope identifier
/// (`project:<id>` / `organization:<id>` / `unscoped`), then by feature name.
pub type ScopedResults = FxHashMap<String, FxHashMap<String, bool>>;

/// A pluggable evaluator for a declared set of feature names.
///
/// Handlers are consulted in registration order; the first one returning
/// `Some` settles the check. Returning `Ok(None)` defers to the next
/// mechanism (further handlers, the entity handler, the static default).
pub trait FeatureHandler: Send + Sync {
    /// The feature names this handler answers for.
    fn features(&self) -> &[String];

    /// Evaluate a single check.
    fn has(&self, feature: &Feature<'_>, actor: Option<&User>) -> Result<Option<bool>, FlagError>;

    /// Evaluate a whole batch at once.
    ///
    /// The default implementation falls back to per-object single checks for
    /// handlers without native batch support.
    fn has_for_batch(&self, batch: &FeatureCheckBatch<'_>) -> Result<BatchAnswers, FlagError> {
        let mut answers = BatchAnswers::default();
        for (project, feature) in batch.feature_objects() {
            answers.insert(project.id, self.has(&feature, batch.actor)?);
        }
        Ok(answers)
    }
}

/// The single catch-all evaluator consulted after per-feature handlers.
///
/// Unlike [`FeatureHandler`], an entity handler is not tied to a declared
/// name set and, when installed, answers multi-feature requests wholesale.
pub trait EntityFeatureHandler: Send + Sync {
    /// Evaluate a single check. `Ok(None)` falls through to the static default.
    fn has(&self, feature: &Feature<'_>, actor: Option<&User>) -> Result<Option<bool>, FlagError>;

    /// Answer a multi-feature request across projects and/or an organization.
    fn batch_has(
        &self,
        names: &[&str],
        actor: Option<&User>,
        projects: Option<&[Project]>,
        organization: Option<&Organization>,
    ) -> Result<Option<ScopedResults>, FlagError>;
}
