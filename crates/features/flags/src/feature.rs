use flagstone_domain::context::{Organization, Project, User};
use flagstone_domain::scope::FeatureScope;

/// The entity a feature check is bound to.
#[derive(Debug, Clone, Copy)]
pub enum FeatureContext<'a> {
    /// No entity; system-wide toggles.
    System,
    Organization(&'a Organization),
    Project(&'a Project),
    User(&'a User),
}

impl<'a> FeatureContext<'a> {
    /// The scope this context satisfies.
    #[must_use]
    pub const fn scope(&self) -> FeatureScope {
        match self {
            Self::System => FeatureScope::System,
            Self::Organization(_) => FeatureScope::Organization,
            Self::Project(_) => FeatureScope::Project,
            Self::User(_) => FeatureScope::User,
        }
    }

    #[must_use]
    pub const fn organization(&self) -> Option<&'a Organization> {
        match self {
            Self::Organization(organization) => Some(organization),
            _ => None,
        }
    }

    #[must_use]
    pub const fn project(&self) -> Option<&'a Project> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&'a User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }
}

/// A single feature check: name plus the entity it is bound to.
///
/// Stateless value object, constructed per check via
/// [`FeatureManager::get`](crate::FeatureManager::get) and discarded when the
/// check completes.
#[derive(Debug, Clone, Copy)]
pub struct Feature<'a> {
    pub name: &'a str,
    pub context: FeatureContext<'a>,
}

impl<'a> Feature<'a> {
    #[must_use]
    pub const fn new(name: &'a str, context: FeatureContext<'a>) -> Self {
        Self { name, context }
    }

    #[must_use]
    pub const fn organization(&self) -> Option<&'a Organization> {
        self.context.organization()
    }

    #[must_use]
    pub const fn project(&self) -> Option<&'a Project> {
        self.context.project()
    }
}
