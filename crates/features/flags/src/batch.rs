use crate::feature::{Feature, FeatureContext};
use flagstone_domain::context::{Organization, Project, User};

/// A batch of projects to be checked for one feature.
///
/// An instance encapsulates a single call to
/// [`FeatureManager::has_for_batch`](crate::FeatureManager::has_for_batch).
/// The projects share a common parent organization, and the batch shrinks as
/// handlers claim objects: `objects` holds only the projects still
/// unresolved when the batch reaches a handler.
#[derive(Debug)]
pub struct FeatureCheckBatch<'a> {
    pub feature_name: &'a str,
    pub organization: &'a Organization,
    pub objects: Vec<&'a Project>,
    pub actor: Option<&'a User>,
}

impl<'a> FeatureCheckBatch<'a> {
    /// Iterate over individual [`Feature`] objects.
    ///
    /// This is a fallback mode for handlers that do not support checking the
    /// entire batch at once.
    pub fn feature_objects(&self) -> impl Iterator<Item = (&'a Project, Feature<'a>)> + '_ {
        self.objects
            .iter()
            .map(|project| (*project, Feature::new(self.feature_name, FeatureContext::Project(project))))
    }

    /// The entity the batch is evaluated against: the organization shared by
    /// every project in the batch.
    #[must_use]
    pub const fn subject(&self) -> &'a Organization {
        self.organization
    }

    /// Number of projects still unresolved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
