//! Configuration types for Beetle Gate

use crate::{route_matches, GateError, Result, RoutePath};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";
pub const INSIGHTS_LOADING_MESSAGE: &str = "Loading insights...";

/// One precondition a route requires, by source name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconditionSpec {
    /// Registered source name
    pub name: String,

    /// Target when the source is loaded but unsatisfied
    pub redirect: RoutePath,
}

impl PreconditionSpec {
    pub fn new(name: impl Into<String>, redirect: RoutePath) -> Self {
        Self {
            name: name.into(),
            redirect,
        }
    }
}

/// A guarded route pattern and its ordered preconditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardedRoute {
    /// Route pattern (supports * and ?)
    pub path: String,

    /// Overrides the top-level loading message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_message: Option<String>,

    /// Evaluated in declaration order
    pub preconditions: Vec<PreconditionSpec>,
}

impl GuardedRoute {
    pub fn matches(&self, path: &str) -> bool {
        route_matches(&self.path, path)
    }
}

/// Route guard configuration (guards.yaml / guards.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardConfig {
    /// Shown while any precondition is loading
    #[serde(default = "default_loading_message")]
    pub loading_message: String,

    /// First matching route wins
    #[serde(default)]
    pub routes: Vec<GuardedRoute>,
}

fn default_loading_message() -> String {
    DEFAULT_LOADING_MESSAGE.to_string()
}

impl Default for GuardConfig {
    /// The insights page guard: signed in, then a repository selected
    fn default() -> Self {
        Self {
            loading_message: default_loading_message(),
            routes: vec![GuardedRoute {
                path: "/contribution/insights".to_string(),
                loading_message: Some(INSIGHTS_LOADING_MESSAGE.to_string()),
                preconditions: vec![
                    PreconditionSpec::new("authentication", RoutePath::root()),
                    PreconditionSpec::new(
                        "repository-selected",
                        RoutePath::from_static("/contribution"),
                    ),
                ],
            }],
        }
    }
}

impl GuardConfig {
    /// Load configuration from a YAML or JSON file (by extension)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check precondition names are non-empty and unique per route
    pub fn validate(&self) -> Result<()> {
        for route in &self.routes {
            if route.path.is_empty() {
                return Err(GateError::Config("route path is empty".to_string()));
            }

            let mut seen = HashSet::new();
            for spec in &route.preconditions {
                if spec.name.trim().is_empty() {
                    return Err(GateError::Config(format!(
                        "route '{}' has a precondition with an empty name",
                        route.path
                    )));
                }
                if !seen.insert(spec.name.as_str()) {
                    return Err(GateError::Config(format!(
                        "route '{}' lists precondition '{}' more than once",
                        route.path, spec.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// First route whose pattern matches the path
    pub fn route_for(&self, path: &str) -> Option<&GuardedRoute> {
        self.routes.iter().find(|r| r.matches(path))
    }

    /// Loading message for a route, falling back to the top-level one
    pub fn loading_message_for(&self, route: &GuardedRoute) -> String {
        route
            .loading_message
            .clone()
            .unwrap_or_else(|| self.loading_message.clone())
    }
}
