use crate::batch::FeatureCheckBatch;
use crate::error::FlagError;
use crate::feature::{Feature, FeatureContext};
use crate::handler::{EntityFeatureHandler, FeatureHandler, ScopedResults};
use flagstone_domain::context::{Organization, Project, ProjectId, User};
use flagstone_domain::scope::{FeatureScope, FeatureStrategy};
use flagstone_metrics::FlagMetrics;
use flagstone_options::OptionsStore;
use fxhash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug_span, error, trace};

/// Prefix of the companion dynamic-configuration options registered for
/// externally flagged features.
pub const FLAG_OPTION_PREFIX: &str = "feature";

/// Registration record of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureEntry {
    pub scope: FeatureScope,
    pub strategy: FeatureStrategy,
}

/// Builds a [`FeatureManager`] wired to its collaborators.
#[derive(Debug, Default)]
pub struct FeatureManagerBuilder {
    options: Option<OptionsStore>,
    metrics: Option<FlagMetrics>,
}

impl FeatureManagerBuilder {
    /// Use a shared options store for companion-option registration.
    #[must_use]
    pub fn options(mut self, options: OptionsStore) -> Self {
        self.options = Some(options);
        self
    }

    /// Emit evaluation telemetry through these collectors.
    #[must_use]
    pub fn metrics(mut self, metrics: FlagMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn build(self) -> FeatureManager {
        FeatureManager {
            registry: FxHashMap::default(),
            handlers: FxHashMap::default(),
            entity_handler: None,
            entity_features: FxHashSet::default(),
            option_features: FxHashSet::default(),
            flag_service_features: FxHashSet::default(),
            defaults: FxHashMap::default(),
            options: self.options.unwrap_or_default(),
            metrics: self.metrics,
        }
    }
}

/// The feature-flag registry and evaluation engine.
///
/// Owned by the application's composition root: registration happens through
/// `&mut self` while the application starts up, after which the manager is
/// shared immutably (e.g., behind an `Arc`) with request-handling code.
/// Concurrent reads are safe; there is no ambient global instance.
///
/// A check walks the mechanisms in a fixed order: per-feature handlers in
/// registration order, then the entity handler, then the static default,
/// then `false`. The first opinionated result wins.
pub struct FeatureManager {
    registry: FxHashMap<String, FeatureEntry>,
    handlers: FxHashMap<String, Vec<Arc<dyn FeatureHandler>>>,
    entity_handler: Option<Arc<dyn EntityFeatureHandler>>,
    entity_features: FxHashSet<String>,
    option_features: FxHashSet<String>,
    flag_service_features: FxHashSet<String>,
    defaults: FxHashMap<String, bool>,
    options: OptionsStore,
    metrics: Option<FlagMetrics>,
}

impl Default for FeatureManager {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FeatureManager {
    #[must_use]
    pub fn builder() -> FeatureManagerBuilder {
        FeatureManagerBuilder::default()
    }

    /// Registers a feature under its naming-convention scope.
    ///
    /// `strategy` accepts either a [`FeatureStrategy`] or the legacy boolean
    /// flag (`true` → remote, `false` → internal). Externally flagged
    /// features (remote / flag-service) get a companion option
    /// `feature.<name>` registered with an empty-mapping default, so an
    /// unset flag evaluates to "unknown" rather than a hard default.
    ///
    /// Re-registration silently overwrites the entry; the static default is
    /// seeded only when the name has none yet.
    ///
    /// # Errors
    /// Returns [`FlagError::InvalidRegistration`] for user-scoped names with
    /// the remote or options strategy, and propagates companion-option
    /// registration failures.
    pub fn add(
        &mut self,
        name: &str,
        strategy: impl Into<FeatureStrategy>,
        default: bool,
    ) -> Result<(), FlagError> {
        let strategy = strategy.into();
        let scope = FeatureScope::of(name);

        if scope == FeatureScope::User
            && matches!(strategy, FeatureStrategy::Remote | FeatureStrategy::Options)
        {
            return Err(FlagError::InvalidRegistration {
                name: name.to_owned(),
                reason: "user-scoped features cannot use the remote or options strategy".into(),
            });
        }

        match strategy {
            FeatureStrategy::Remote => {
                self.entity_features.insert(name.to_owned());
            }
            FeatureStrategy::Options => {
                self.option_features.insert(name.to_owned());
            }
            FeatureStrategy::Internal | FeatureStrategy::FlagService => {}
        }

        if strategy.is_external() && self.flag_service_features.insert(name.to_owned()) {
            self.options
                .register(format!("{FLAG_OPTION_PREFIX}.{name}"), Value::Object(Map::new()))?;
        }

        self.defaults.entry(name.to_owned()).or_insert(default);

        trace!(feature = name, %strategy, %scope, "Registering feature");
        self.registry.insert(name.to_owned(), FeatureEntry { scope, strategy });
        Ok(())
    }

    /// Registers a per-feature handler for every name in
    /// [`FeatureHandler::features`]. Handlers run in registration order.
    pub fn add_handler(&mut self, handler: Arc<dyn FeatureHandler>) {
        for name in handler.features() {
            self.handlers.entry(name.clone()).or_default().push(Arc::clone(&handler));
        }
    }

    /// Installs the catch-all handler consulted after per-feature handlers.
    /// A second call replaces the previous one.
    pub fn add_entity_handler(&mut self, handler: Arc<dyn EntityFeatureHandler>) {
        self.entity_handler = Some(handler);
    }

    /// Sets or overrides the static default for a name. Used by the
    /// configuration layer; accepts names registered later.
    pub fn set_default(&mut self, name: &str, value: bool) {
        self.defaults.insert(name.to_owned(), value);
    }

    /// Whether a feature with this name has been registered.
    #[must_use]
    pub fn has_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Registered name/entry pairs, optionally restricted to one scope.
    pub fn all(&self, scope: Option<FeatureScope>) -> impl Iterator<Item = (&str, FeatureEntry)> {
        self.registry
            .iter()
            .filter(move |(_, entry)| scope.is_none_or(|s| entry.scope == s))
            .map(|(name, entry)| (name.as_str(), *entry))
    }

    /// Names registered with the remote strategy.
    pub fn entity_features(&self) -> impl Iterator<Item = &str> {
        self.entity_features.iter().map(String::as_str)
    }

    /// Names registered with the options strategy.
    pub fn option_features(&self) -> impl Iterator<Item = &str> {
        self.option_features.iter().map(String::as_str)
    }

    /// Names with a companion option (remote or flag-service strategies).
    pub fn flag_service_features(&self) -> impl Iterator<Item = &str> {
        self.flag_service_features.iter().map(String::as_str)
    }

    /// Constructs the per-check [`Feature`] object for a registered name.
    ///
    /// # Errors
    /// Returns [`FlagError::NotRegistered`] for unknown names and
    /// [`FlagError::ContextMismatch`] when the context kind does not satisfy
    /// the feature's scope.
    pub fn get<'a>(
        &self,
        name: &'a str,
        context: FeatureContext<'a>,
    ) -> Result<Feature<'a>, FlagError> {
        let entry =
            self.registry.get(name).ok_or_else(|| FlagError::NotRegistered(name.to_owned()))?;

        let actual = context.scope();
        if entry.scope != actual {
            return Err(FlagError::ContextMismatch {
                name: name.to_owned(),
                expected: entry.scope,
                actual,
            });
        }

        Ok(Feature::new(name, context))
    }

    /// Determines whether a feature is enabled, consulting the entity
    /// handler when installed.
    ///
    /// Never fails: any evaluation error is logged and converted to a
    /// fail-closed `false` here, at the outermost entry point. Each call
    /// emits a latency observation and a result-tagged counter increment.
    pub fn has(&self, name: &str, context: FeatureContext<'_>, actor: Option<&User>) -> bool {
        self.check(name, context, actor, false)
    }

    /// Like [`Self::has`], but bypasses the entity handler even when one is
    /// installed, falling through to the static default.
    pub fn has_skip_entity(
        &self,
        name: &str,
        context: FeatureContext<'_>,
        actor: Option<&User>,
    ) -> bool {
        self.check(name, context, actor, true)
    }

    fn check(
        &self,
        name: &str,
        context: FeatureContext<'_>,
        actor: Option<&User>,
        skip_entity: bool,
    ) -> bool {
        let _timer = self.metrics.as_ref().map(|m| m.start_has(name));

        let result = match self.evaluate(name, context, actor, skip_entity) {
            Ok(result) => result,
            Err(error) => {
                error!(feature = name, %error, "Failed to run feature check");
                false
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_result(name, result);
        }
        result
    }

    fn evaluate(
        &self,
        name: &str,
        context: FeatureContext<'_>,
        actor: Option<&User>,
        skip_entity: bool,
    ) -> Result<bool, FlagError> {
        let feature = self.get(name, context)?;

        if let Some(handlers) = self.handlers.get(name) {
            for handler in handlers {
                if let Some(result) = handler.has(&feature, actor)? {
                    return Ok(result);
                }
            }
        }

        if !skip_entity
            && let Some(entity) = &self.entity_handler
            && let Some(result) = entity.has(&feature, actor)?
        {
            return Ok(result);
        }

        Ok(self.default_for(name))
    }

    /// Determines in a batch whether one feature is enabled for many
    /// projects sharing a parent organization.
    ///
    /// Handlers run in registration order, each seeing only the projects
    /// still unresolved; the loop stops early once nothing is pending.
    /// Projects left over after all handlers receive the static default.
    /// The result has exactly one entry per input project.
    ///
    /// Like [`Self::has`], this never fails: a handler error resolves the
    /// whole remaining batch to the static default.
    pub fn has_for_batch(
        &self,
        name: &str,
        organization: &Organization,
        projects: &[Project],
        actor: Option<&User>,
    ) -> FxHashMap<ProjectId, bool> {
        match self.evaluate_batch(name, organization, projects, actor) {
            Ok(results) => results,
            Err(error) => {
                error!(feature = name, %error, "Failed to run batch feature check");
                let default = self.default_for(name);
                projects.iter().map(|project| (project.id, default)).collect()
            }
        }
    }

    fn evaluate_batch(
        &self,
        name: &str,
        organization: &Organization,
        projects: &[Project],
        actor: Option<&User>,
    ) -> Result<FxHashMap<ProjectId, bool>, FlagError> {
        let mut results = FxHashMap::default();
        let mut remaining: Vec<&Project> = projects.iter().collect();

        if let Some(handlers) = self.handlers.get(name) {
            for handler in handlers {
                if remaining.is_empty() {
                    break;
                }

                let span =
                    debug_span!("feature_batch_handler", feature = name, pending = remaining.len());
                let _enter = span.enter();

                let batch = FeatureCheckBatch {
                    feature_name: name,
                    organization,
                    objects: remaining.clone(),
                    actor,
                };
                let answers = handler.has_for_batch(&batch)?;

                remaining.retain(|project| match answers.get(&project.id) {
                    Some(Some(flag)) => {
                        results.insert(project.id, *flag);
                        false
                    }
                    _ => true,
                });
            }
        }

        let default = self.default_for(name);
        for project in remaining {
            results.insert(project.id, default);
        }
        Ok(results)
    }

    /// Determines whether multiple features are enabled in one call.
    ///
    /// When an entity handler is installed, it alone answers the whole
    /// request. Otherwise names are partitioned by scope prefix and the
    /// first applicable partition is evaluated via [`Self::has`]: project
    /// features (requires `projects`), then organization features (requires
    /// `organization`), then unscoped names. Mixing scope kinds in one call
    /// is unsupported; inapplicable partitions are not evaluated. Returns
    /// `None` when no partition applies.
    ///
    /// Result keys are `project:<id>`, `organization:<id>`, or `unscoped`.
    pub fn batch_has(
        &self,
        names: &[&str],
        actor: Option<&User>,
        projects: Option<&[Project]>,
        organization: Option<&Organization>,
    ) -> Option<ScopedResults> {
        if let Some(entity) = &self.entity_handler {
            return match entity.batch_has(names, actor, projects, organization) {
                Ok(results) => results,
                Err(error) => {
                    error!(%error, "Failed to run multi-feature check");
                    None
                }
            };
        }

        let project_features: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| FeatureScope::of(name) == FeatureScope::Project)
            .collect();
        if let Some(projects) = projects
            && !project_features.is_empty()
        {
            let mut results = ScopedResults::default();
            for project in projects {
                let entry = results.entry(format!("project:{}", project.id)).or_default();
                for name in &project_features {
                    entry.insert(
                        (*name).to_owned(),
                        self.has(name, FeatureContext::Project(project), actor),
                    );
                }
            }
            return Some(results);
        }

        let organization_features: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| FeatureScope::of(name) == FeatureScope::Organization)
            .collect();
        if let Some(organization) = organization
            && !organization_features.is_empty()
        {
            let mut checks = FxHashMap::default();
            for name in organization_features {
                checks.insert(
                    name.to_owned(),
                    self.has(name, FeatureContext::Organization(organization), actor),
                );
            }
            let mut results = ScopedResults::default();
            results.insert(format!("organization:{}", organization.id), checks);
            return Some(results);
        }

        let unscoped_features: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| {
                !matches!(
                    FeatureScope::of(name),
                    FeatureScope::Project | FeatureScope::Organization
                )
            })
            .collect();
        if !unscoped_features.is_empty() {
            let mut checks = FxHashMap::default();
            for name in unscoped_features {
                checks.insert(name.to_owned(), self.has(name, FeatureContext::System, actor));
            }
            let mut results = ScopedResults::default();
            results.insert("unscoped".to_owned(), checks);
            return Some(results);
        }

        None
    }

    fn default_for(&self, name: &str) -> bool {
        self.defaults.get(name).copied().unwrap_or(false)
    }
}

impl fmt::Debug for FeatureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureManager")
            .field("registered", &self.registry.len())
            .field("handlers", &self.handlers.len())
            .field("entity_handler", &self.entity_handler.is_some())
            .finish_non_exhaustive()
    }
}
