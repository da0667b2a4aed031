//! Route paths and route pattern matching

use crate::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigation target inside the application (e.g. `/contribution`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Parse and validate a route path
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| GateError::InvalidRoute {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("route is empty"));
        }
        if !path.starts_with('/') {
            return Err(invalid("route must start with '/'"));
        }
        if path.chars().any(char::is_whitespace) {
            return Err(invalid("route must not contain whitespace"));
        }

        Ok(Self(path.to_string()))
    }

    /// Known-good literal routes used by built-in defaults
    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(Self::parse(path).is_ok(), "invalid static route {path}");
        Self(path.to_string())
    }

    /// The site root
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.0
    }
}

impl std::str::FromStr for RoutePath {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Simple glob matching for route patterns (supports * and ?)
pub fn route_matches(pattern: &str, path: &str) -> bool {
    let regex_pattern = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    regex::Regex::new(&format!("^{}$", regex_pattern))
        .map(|r| r.is_match(path))
        .unwrap_or(false)
}
