//! Guarded pages of the contribution area

use contexts::{AuthContext, RepositoryContext};
use gate::PreconditionSet;
use shared::{ContentRenderError, RoutePath, INSIGHTS_LOADING_MESSAGE};
use std::fmt;
use std::sync::Arc;

use crate::page::GuardedPage;

/// Route constants
pub mod routes {
    use shared::RoutePath;

    pub const LANDING: &str = "/";
    pub const CONTRIBUTION: &str = "/contribution";
    pub const INSIGHTS: &str = "/contribution/insights";

    pub fn landing() -> RoutePath {
        RoutePath::root()
    }

    pub fn contribution() -> RoutePath {
        parse(CONTRIBUTION)
    }

    pub fn insights() -> RoutePath {
        parse(INSIGHTS)
    }

    fn parse(path: &'static str) -> RoutePath {
        match RoutePath::parse(path) {
            Ok(route) => route,
            Err(e) => unreachable!("route constant {path} is invalid: {e}"),
        }
    }
}

/// Insights page: signed in first, then a repository selected
pub fn insights(auth: &AuthContext, repository: &RepositoryContext) -> GuardedPage {
    let preconditions = PreconditionSet::new()
        .with("authentication", routes::landing(), Arc::new(auth.clone()))
        .with(
            "repository-selected",
            routes::contribution(),
            Arc::new(repository.clone()),
        );

    GuardedPage::new(routes::insights(), preconditions, INSIGHTS_LOADING_MESSAGE)
}

/// Header of the insights view once the gate lets it through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsHeader {
    pub repository: String,
    pub branch: String,
    pub viewer: String,
}

impl fmt::Display for InsightsHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Insights for {} ({}) as {}", self.repository, self.branch, self.viewer)
    }
}

/// Read the contexts for the insights header.
///
/// Fails if a context changed between the gate decision and this read.
pub fn insights_header(
    auth: &AuthContext,
    repository: &RepositoryContext,
) -> Result<InsightsHeader, ContentRenderError> {
    let viewer = auth
        .state()
        .and_then(|s| s.user_login)
        .ok_or_else(|| ContentRenderError::new("signed-in user is no longer available"))?;
    let repository = repository
        .repository()
        .ok_or_else(|| ContentRenderError::new("selected repository is no longer available"))?;

    Ok(InsightsHeader {
        repository: repository.full_name(),
        branch: repository.default_branch,
        viewer,
    })
}

/// Route a redirect lands on, for display
pub fn describe(route: &RoutePath) -> &'static str {
    match route.as_str() {
        routes::LANDING => "landing page",
        routes::CONTRIBUTION => "contribution home",
        routes::INSIGHTS => "contribution insights",
        _ => "page",
    }
}
