#![allow(dead_code)]

use flagstone_domain::context::{Organization, OrganizationId, Project, ProjectId, User};
use flagstone_flags::{
    BatchAnswers, EntityFeatureHandler, Feature, FeatureCheckBatch, FeatureHandler, FlagError,
    ScopedResults,
};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn org() -> Organization {
    Organization::new(1, "acme")
}

pub fn project(id: u64) -> Project {
    Project::new(id, OrganizationId(1), format!("proj-{id}"))
}

pub fn user() -> User {
    User::new(7)
}

/// Handler that always gives the same answer for its declared features.
pub struct StaticHandler {
    features: Vec<String>,
    answer: Option<bool>,
    pub calls: AtomicUsize,
}

impl StaticHandler {
    pub fn new(feature: &str, answer: Option<bool>) -> Self {
        Self { features: vec![feature.to_owned()], answer, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeatureHandler for StaticHandler {
    fn features(&self) -> &[String] {
        &self.features
    }

    fn has(&self, _feature: &Feature<'_>, _actor: Option<&User>) -> Result<Option<bool>, FlagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// Handler that fails every check.
pub struct FailingHandler {
    features: Vec<String>,
}

impl FailingHandler {
    pub fn new(feature: &str) -> Self {
        Self { features: vec![feature.to_owned()] }
    }
}

impl FeatureHandler for FailingHandler {
    fn features(&self) -> &[String] {
        &self.features
    }

    fn has(&self, feature: &Feature<'_>, _actor: Option<&User>) -> Result<Option<bool>, FlagError> {
        Err(FlagError::Handler {
            name: feature.name.to_owned(),
            message: "flag backend unavailable".into(),
        })
    }
}

/// Batch handler that resolves a fixed set of project ids and defers on the rest.
pub struct SubsetBatchHandler {
    features: Vec<String>,
    answers: Vec<(ProjectId, bool)>,
    pub batch_calls: AtomicUsize,
}

impl SubsetBatchHandler {
    pub fn new(feature: &str, answers: Vec<(ProjectId, bool)>) -> Self {
        Self { features: vec![feature.to_owned()], answers, batch_calls: AtomicUsize::new(0) }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

impl FeatureHandler for SubsetBatchHandler {
    fn features(&self) -> &[String] {
        &self.features
    }

    fn has(&self, _feature: &Feature<'_>, _actor: Option<&User>) -> Result<Option<bool>, FlagError> {
        Ok(None)
    }

    fn has_for_batch(&self, batch: &FeatureCheckBatch<'_>) -> Result<BatchAnswers, FlagError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut out = BatchAnswers::default();
        for project in &batch.objects {
            let answer =
                self.answers.iter().find(|(id, _)| *id == project.id).map(|(_, flag)| *flag);
            out.insert(project.id, answer);
        }
        Ok(out)
    }
}

/// Entity handler with a fixed single-check answer; defers on multi-feature requests.
pub struct StaticEntityHandler {
    answer: Option<bool>,
    pub calls: AtomicUsize,
}

impl StaticEntityHandler {
    pub fn new(answer: Option<bool>) -> Self {
        Self { answer, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntityFeatureHandler for StaticEntityHandler {
    fn has(&self, _feature: &Feature<'_>, _actor: Option<&User>) -> Result<Option<bool>, FlagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }

    fn batch_has(
        &self,
        names: &[&str],
        _actor: Option<&User>,
        _projects: Option<&[Project]>,
        organization: Option<&Organization>,
    ) -> Result<Option<ScopedResults>, FlagError> {
        let answer = match self.answer {
            Some(answer) => answer,
            None => return Ok(None),
        };
        let key = organization
            .map_or_else(|| "unscoped".to_owned(), |org| format!("organization:{}", org.id));
        let mut checks = fxhash::FxHashMap::default();
        for name in names {
            checks.insert((*name).to_owned(), answer);
        }
        let mut results = ScopedResults::default();
        results.insert(key, checks);
        Ok(Some(results))
    }
}
