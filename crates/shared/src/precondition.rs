//! Precondition snapshots and the gate decision they produce

use crate::RoutePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of one guarded precondition at evaluation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconditionState {
    /// Identifier (e.g. "authentication", "repository-selected")
    pub name: String,

    /// Whether the upstream source finished its initial resolution
    pub is_loaded: bool,

    /// Whether the precondition holds. Only meaningful once loaded.
    #[serde(default)]
    pub is_satisfied: bool,

    /// Where to go when loaded but unsatisfied
    pub on_unsatisfied: RoutePath,
}

impl PreconditionState {
    pub fn new(
        name: impl Into<String>,
        is_loaded: bool,
        is_satisfied: bool,
        on_unsatisfied: RoutePath,
    ) -> Self {
        Self {
            name: name.into(),
            is_loaded,
            is_satisfied,
            on_unsatisfied,
        }
    }

    /// Source has not resolved yet
    pub fn unloaded(name: impl Into<String>, on_unsatisfied: RoutePath) -> Self {
        Self::new(name, false, false, on_unsatisfied)
    }

    /// Loaded and holding
    pub fn satisfied(name: impl Into<String>, on_unsatisfied: RoutePath) -> Self {
        Self::new(name, true, true, on_unsatisfied)
    }

    /// Loaded and failing
    pub fn unsatisfied(name: impl Into<String>, on_unsatisfied: RoutePath) -> Self {
        Self::new(name, true, false, on_unsatisfied)
    }

    /// Loaded and failing, i.e. a redirect is due
    pub fn requires_redirect(&self) -> bool {
        self.is_loaded && !self.is_satisfied
    }
}

/// The gate decision for a list of preconditions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum GateResult {
    /// At least one precondition has not loaded
    Pending,
    /// First unsatisfied precondition's target, in declaration order
    Redirecting(RoutePath),
    /// Everything loaded and satisfied
    Ready,
}

impl GateResult {
    /// Decide among Pending, Redirecting and Ready.
    ///
    /// Loading is checked across the whole list before any redirect is
    /// considered, so an unsatisfied entry never redirects while an earlier
    /// or later entry is still resolving. Among unsatisfied entries the first
    /// declared one wins.
    pub fn evaluate(preconditions: &[PreconditionState]) -> Self {
        if preconditions.iter().any(|p| !p.is_loaded) {
            return GateResult::Pending;
        }

        match preconditions.iter().find(|p| !p.is_satisfied) {
            Some(unsatisfied) => GateResult::Redirecting(unsatisfied.on_unsatisfied.clone()),
            None => GateResult::Ready,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GateResult::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GateResult::Ready)
    }

    pub fn redirect_target(&self) -> Option<&RoutePath> {
        match self {
            GateResult::Redirecting(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for GateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateResult::Pending => write!(f, "pending"),
            GateResult::Redirecting(target) => write!(f, "redirecting to {}", target),
            GateResult::Ready => write!(f, "ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> RoutePath {
        RoutePath::parse(path).unwrap()
    }

    #[test]
    fn test_all_unloaded_is_pending() {
        let states = vec![
            PreconditionState::unloaded("authentication", route("/")),
            PreconditionState::unloaded("repository-selected", route("/contribution")),
        ];
        assert_eq!(GateResult::evaluate(&states), GateResult::Pending);
    }

    #[test]
    fn test_all_satisfied_is_ready() {
        let states = vec![
            PreconditionState::satisfied("authentication", route("/")),
            PreconditionState::satisfied("repository-selected", route("/contribution")),
        ];
        assert_eq!(GateResult::evaluate(&states), GateResult::Ready);
    }

    #[test]
    fn test_empty_list_is_ready() {
        assert_eq!(GateResult::evaluate(&[]), GateResult::Ready);
    }

    #[test]
    fn test_unsatisfied_repository_redirects() {
        let states = vec![
            PreconditionState::satisfied("auth", route("/")),
            PreconditionState::unsatisfied("repo", route("/contribution")),
        ];
        assert_eq!(
            GateResult::evaluate(&states),
            GateResult::Redirecting(route("/contribution"))
        );
    }

    #[test]
    fn test_first_declared_unsatisfied_wins() {
        let states = vec![
            PreconditionState::unsatisfied("a", route("/a")),
            PreconditionState::unsatisfied("b", route("/b")),
        ];
        assert_eq!(GateResult::evaluate(&states), GateResult::Redirecting(route("/a")));

        let reversed: Vec<_> = states.into_iter().rev().collect();
        assert_eq!(GateResult::evaluate(&reversed), GateResult::Redirecting(route("/b")));
    }

    #[test]
    fn test_unloaded_entry_holds_back_redirect() {
        let states = vec![
            PreconditionState::unsatisfied("auth", route("/")),
            PreconditionState::unloaded("repo", route("/contribution")),
        ];
        assert_eq!(GateResult::evaluate(&states), GateResult::Pending);
    }

    #[test]
    fn test_satisfied_flag_ignored_before_load() {
        let states = vec![PreconditionState::new("auth", false, true, route("/"))];
        assert_eq!(GateResult::evaluate(&states), GateResult::Pending);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let states = vec![
            PreconditionState::satisfied("auth", route("/")),
            PreconditionState::unsatisfied("repo", route("/contribution")),
        ];
        let first = GateResult::evaluate(&states);
        for _ in 0..10 {
            assert_eq!(GateResult::evaluate(&states.clone()), first);
        }
    }

    #[test]
    fn test_state_serde_uses_camel_case() {
        let json = r#"{"name":"auth","isLoaded":true,"isSatisfied":false,"onUnsatisfied":"/"}"#;
        let state: PreconditionState = serde_json::from_str(json).unwrap();
        assert!(state.requires_redirect());
        assert_eq!(state.on_unsatisfied, RoutePath::root());
    }

    #[test]
    fn test_result_serde_shape() {
        let value = serde_json::to_value(GateResult::Redirecting(route("/a"))).unwrap();
        assert_eq!(value, serde_json::json!({"state": "redirecting", "target": "/a"}));

        let value = serde_json::to_value(GateResult::Ready).unwrap();
        assert_eq!(value, serde_json::json!({"state": "ready"}));
    }
}
