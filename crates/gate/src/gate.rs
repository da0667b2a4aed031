//! PreconditionGate - Loading / redirect / render decisions for a guarded view
//!
//! The gate is re-run by the host on every change of an underlying source:
//! 1. Evaluate: any precondition still loading -> Pending
//! 2. Redirect: first unsatisfied precondition (declaration order) -> navigate once
//! 3. Render: everything holds -> run the content callback
//!
//! The only side effect is the navigation call. It fires when the redirect
//! target differs from the last one fired, never on a plain re-render.

use serde::Serialize;
use shared::{ContentRenderError, GateResult, PreconditionState, RoutePath, DEFAULT_LOADING_MESSAGE};
use std::fmt;
use tracing::{debug, info, warn};

use crate::navigation::Navigator;

pub const RETRY_LABEL: &str = "Try Again";

/// Gate-internal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GatePhase {
    /// Waiting for at least one source
    Pending,
    /// Navigation requested, view about to be replaced
    Redirecting { target: RoutePath },
    /// Content rendered
    Ready,
    /// Preconditions hold but the content failed to render
    Failed { error: String },
}

impl GatePhase {
    /// The precondition decision behind this phase
    pub fn result(&self) -> GateResult {
        match self {
            GatePhase::Pending => GateResult::Pending,
            GatePhase::Redirecting { target } => GateResult::Redirecting(target.clone()),
            GatePhase::Ready | GatePhase::Failed { .. } => GateResult::Ready,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GatePhase::Pending => "pending",
            GatePhase::Redirecting { .. } => "redirecting",
            GatePhase::Ready => "ready",
            GatePhase::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatePhase::Redirecting { target } => write!(f, "redirecting to {}", target),
            GatePhase::Failed { error } => write!(f, "failed: {}", error),
            other => f.write_str(other.name()),
        }
    }
}

/// User-visible error panel with a manual retry action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPanel {
    pub message: String,
    pub retry_label: String,
}

impl ErrorPanel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry_label: RETRY_LABEL.to_string(),
        }
    }
}

/// What the host should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    /// Loading indicator
    Loading { message: String },
    /// Navigation in flight, render nothing
    Navigating { target: RoutePath },
    /// Error panel
    Failed(ErrorPanel),
    /// The protected content
    Content(T),
}

impl<T> GateView<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, GateView::Loading { .. })
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            GateView::Content(content) => Some(content),
            _ => None,
        }
    }

    pub fn into_content(self) -> Option<T> {
        match self {
            GateView::Content(content) => Some(content),
            _ => None,
        }
    }
}

/// Events emitted by the gate
///
/// Used for auditing and logging. The gate does not act on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GateEvent {
    /// Phase changed
    Transitioned {
        route: Option<RoutePath>,
        from: GatePhase,
        to: GatePhase,
    },
    /// Navigation capability invoked
    Navigated {
        route: Option<RoutePath>,
        target: RoutePath,
    },
    /// Content callback failed
    RenderFailed {
        route: Option<RoutePath>,
        message: String,
    },
    /// Manual retry after a failure
    Retried { route: Option<RoutePath> },
}

/// View-readiness gate
#[derive(Debug)]
pub struct PreconditionGate {
    /// Route being guarded (logging only)
    route: Option<RoutePath>,
    /// Text for the loading indicator
    loading_message: String,
    phase: GatePhase,
    /// Captured render failure, held until `retry`
    error: Option<ContentRenderError>,
    /// Last navigation fired while redirecting
    last_navigation: Option<RoutePath>,
    events: Vec<GateEvent>,
}

impl PreconditionGate {
    pub fn new() -> Self {
        Self {
            route: None,
            loading_message: DEFAULT_LOADING_MESSAGE.to_string(),
            phase: GatePhase::Pending,
            error: None,
            last_navigation: None,
            events: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: RoutePath) -> Self {
        self.route = Some(route);
        self
    }

    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    pub fn current(&self) -> &GatePhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&ContentRenderError> {
        self.error.as_ref()
    }

    pub fn last_navigation(&self) -> Option<&RoutePath> {
        self.last_navigation.as_ref()
    }

    /// Side-effect free decision for a snapshot
    pub fn evaluate(&self, states: &[PreconditionState]) -> GateResult {
        GateResult::evaluate(states)
    }

    /// Decide and act for one re-render.
    ///
    /// Navigates at most once per distinct redirect target and only calls
    /// `render` when every precondition holds and no failure is held.
    pub fn render<T, E, F, N>(
        &mut self,
        states: &[PreconditionState],
        navigator: &mut N,
        render: F,
    ) -> GateView<T>
    where
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
        N: Navigator + ?Sized,
    {
        let result = self.evaluate(states);
        debug!(route = ?self.route, preconditions = states.len(), result = %result, "Gate evaluated");

        match result {
            GateResult::Pending => {
                self.last_navigation = None;
                self.transition(GatePhase::Pending);
                GateView::Loading {
                    message: self.loading_message.clone(),
                }
            }
            GateResult::Redirecting(target) => {
                self.transition(GatePhase::Redirecting {
                    target: target.clone(),
                });

                if self.last_navigation.as_ref() != Some(&target) {
                    info!(route = ?self.route, target = %target, "Precondition unsatisfied, navigating away");
                    navigator.navigate_to(&target);
                    self.last_navigation = Some(target.clone());
                    self.events.push(GateEvent::Navigated {
                        route: self.route.clone(),
                        target: target.clone(),
                    });
                }

                GateView::Navigating { target }
            }
            GateResult::Ready => {
                self.last_navigation = None;

                // No auto-retry: a held failure keeps the panel up
                if let Some(error) = &self.error {
                    let panel = ErrorPanel::new(error.message.clone());
                    self.transition(GatePhase::Failed {
                        error: panel.message.clone(),
                    });
                    return GateView::Failed(panel);
                }

                match render() {
                    Ok(content) => {
                        self.transition(GatePhase::Ready);
                        GateView::Content(content)
                    }
                    Err(e) => {
                        let error = ContentRenderError::new(e.to_string());
                        warn!(route = ?self.route, error = %error.message, "Guarded content failed to render");

                        self.events.push(GateEvent::RenderFailed {
                            route: self.route.clone(),
                            message: error.message.clone(),
                        });
                        let panel = ErrorPanel::new(error.message.clone());
                        self.error = Some(error);
                        self.transition(GatePhase::Failed {
                            error: panel.message.clone(),
                        });
                        GateView::Failed(panel)
                    }
                }
            }
        }
    }

    /// Clear a held failure and start over from Pending
    pub fn retry(&mut self) -> GateResult {
        if let Some(error) = self.error.take() {
            info!(route = ?self.route, error = %error.message, "Retrying guarded content");
        }
        self.last_navigation = None;
        self.events.push(GateEvent::Retried {
            route: self.route.clone(),
        });
        self.transition(GatePhase::Pending);
        GateResult::Pending
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GateEvent> {
        std::mem::take(&mut self.events)
    }

    fn transition(&mut self, to: GatePhase) {
        if self.phase == to {
            return;
        }

        info!(route = ?self.route, from = %self.phase, to = %to, "Gate transition");
        let from = std::mem::replace(&mut self.phase, to.clone());
        self.events.push(GateEvent::Transitioned {
            route: self.route.clone(),
            from,
            to,
        });
    }
}

impl Default for PreconditionGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;
    use std::cell::Cell;

    fn route(path: &str) -> RoutePath {
        RoutePath::parse(path).unwrap()
    }

    fn ok_content() -> Result<&'static str, String> {
        Ok("insights")
    }

    fn redirect_states() -> Vec<PreconditionState> {
        vec![
            PreconditionState::satisfied("auth", route("/")),
            PreconditionState::unsatisfied("repo", route("/contribution")),
        ]
    }

    fn ready_states() -> Vec<PreconditionState> {
        vec![
            PreconditionState::satisfied("auth", route("/")),
            PreconditionState::satisfied("repo", route("/contribution")),
        ]
    }

    #[test]
    fn test_all_unloaded_shows_loading() {
        let mut gate = PreconditionGate::new().with_loading_message("Loading insights...");
        let mut nav = RecordingNavigator::new();
        let states = vec![
            PreconditionState::unloaded("auth", route("/")),
            PreconditionState::unloaded("repo", route("/contribution")),
        ];

        let view = gate.render(&states, &mut nav, ok_content);

        assert_eq!(
            view,
            GateView::Loading {
                message: "Loading insights...".to_string()
            }
        );
        assert_eq!(gate.current(), &GatePhase::Pending);
        assert_eq!(nav.count(), 0);
    }

    #[test]
    fn test_all_satisfied_renders_once() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let calls = Cell::new(0);

        let view = gate.render(&ready_states(), &mut nav, || {
            calls.set(calls.get() + 1);
            Ok::<_, String>("insights")
        });

        assert_eq!(view, GateView::Content("insights"));
        assert_eq!(calls.get(), 1);
        assert_eq!(nav.count(), 0);
        assert_eq!(gate.current(), &GatePhase::Ready);
    }

    #[test]
    fn test_redirect_fires_once_across_rerenders() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();

        for _ in 0..5 {
            let view = gate.render(&redirect_states(), &mut nav, ok_content);
            assert_eq!(
                view,
                GateView::Navigating {
                    target: route("/contribution")
                }
            );
        }

        assert_eq!(nav.history(), &[route("/contribution")]);
        assert_eq!(gate.last_navigation(), Some(&route("/contribution")));
    }

    #[test]
    fn test_redirect_uses_first_declared_target() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let states = vec![
            PreconditionState::unsatisfied("a", route("/a")),
            PreconditionState::unsatisfied("b", route("/b")),
        ];

        gate.render(&states, &mut nav, ok_content);

        assert_eq!(nav.history(), &[route("/a")]);
    }

    #[test]
    fn test_redirect_target_change_fires_again() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();

        gate.render(&[PreconditionState::unsatisfied("a", route("/a"))], &mut nav, ok_content);
        gate.render(&[PreconditionState::unsatisfied("b", route("/b"))], &mut nav, ok_content);

        assert_eq!(nav.history(), &[route("/a"), route("/b")]);
    }

    #[test]
    fn test_redirect_after_leaving_redirect_fires_again() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let pending = vec![PreconditionState::unloaded("auth", route("/"))];
        let redirect = vec![PreconditionState::unsatisfied("auth", route("/"))];

        gate.render(&redirect, &mut nav, ok_content);
        gate.render(&pending, &mut nav, ok_content);
        gate.render(&redirect, &mut nav, ok_content);

        assert_eq!(nav.count(), 2);
    }

    #[test]
    fn test_redirect_after_retry_fires_again() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let redirect = vec![PreconditionState::unsatisfied("auth", route("/"))];

        gate.render(&redirect, &mut nav, ok_content);
        gate.retry();
        assert!(gate.last_navigation().is_none());

        let view = gate.render(&redirect, &mut nav, ok_content);

        assert_eq!(view, GateView::Navigating { target: route("/") });
        assert_eq!(nav.history(), &[route("/"), route("/")]);
        let navigated = gate
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GateEvent::Navigated { .. }))
            .count();
        assert_eq!(navigated, 2);
    }

    #[test]
    fn test_render_error_shows_panel() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();

        let view: GateView<()> = gate.render(&ready_states(), &mut nav, || Err("boom"));

        match view {
            GateView::Failed(panel) => {
                assert!(panel.message.contains("boom"));
                assert_eq!(panel.retry_label, RETRY_LABEL);
            }
            other => panic!("expected error panel, got {:?}", other),
        }
        assert_eq!(gate.error(), Some(&ContentRenderError::new("boom")));
        assert_eq!(gate.current().name(), "failed");
        assert_eq!(nav.count(), 0);
    }

    #[test]
    fn test_no_auto_retry_while_failed() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let calls = Cell::new(0);

        let _: GateView<()> = gate.render(&ready_states(), &mut nav, || {
            calls.set(calls.get() + 1);
            Err("boom")
        });
        let view = gate.render(&ready_states(), &mut nav, || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(())
        });

        assert!(matches!(view, GateView::Failed(_)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_retry_resets_to_pending_then_ready() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();

        let _: GateView<&str> = gate.render(&ready_states(), &mut nav, || Err("boom"));

        assert_eq!(gate.retry(), GateResult::Pending);
        assert_eq!(gate.current(), &GatePhase::Pending);
        assert!(gate.error().is_none());

        let view = gate.render(&ready_states(), &mut nav, ok_content);
        assert_eq!(view, GateView::Content("insights"));
        assert_eq!(gate.current(), &GatePhase::Ready);
    }

    #[test]
    fn test_held_error_does_not_block_redirect() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();

        let _: GateView<()> = gate.render(&ready_states(), &mut nav, || Err("boom"));
        let view = gate.render(&redirect_states(), &mut nav, ok_content);

        assert!(matches!(view, GateView::Navigating { .. }));
        assert_eq!(nav.count(), 1);
        assert!(gate.error().is_some());
    }

    #[test]
    fn test_ready_to_pending_reenters_loading() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let calls = Cell::new(0);
        let mut render = || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(())
        };

        gate.render(&ready_states(), &mut nav, &mut render);
        let view = gate.render(
            &[PreconditionState::unloaded("auth", route("/"))],
            &mut nav,
            &mut render,
        );
        assert!(view.is_loading());

        gate.render(&ready_states(), &mut nav, &mut render);
        assert_eq!(calls.get(), 2);
        assert_eq!(gate.current(), &GatePhase::Ready);
    }

    #[test]
    fn test_events_report_transitions_once() {
        let mut gate = PreconditionGate::new().with_route(route("/contribution/insights"));
        let mut nav = RecordingNavigator::new();

        gate.render(&redirect_states(), &mut nav, ok_content);
        let events = gate.drain_events();
        assert_eq!(
            events,
            vec![
                GateEvent::Transitioned {
                    route: Some(route("/contribution/insights")),
                    from: GatePhase::Pending,
                    to: GatePhase::Redirecting {
                        target: route("/contribution")
                    },
                },
                GateEvent::Navigated {
                    route: Some(route("/contribution/insights")),
                    target: route("/contribution"),
                },
            ]
        );

        gate.render(&redirect_states(), &mut nav, ok_content);
        assert!(gate.drain_events().is_empty());
    }

    #[test]
    fn test_identical_input_is_idempotent() {
        let mut gate = PreconditionGate::new();
        let mut nav = RecordingNavigator::new();
        let states = redirect_states();

        let first = gate.evaluate(&states);
        gate.render(&states, &mut nav, ok_content);
        gate.drain_events();

        for _ in 0..3 {
            assert_eq!(gate.evaluate(&states), first);
            gate.render(&states, &mut nav, ok_content);
        }

        assert_eq!(nav.count(), 1);
        assert!(gate.drain_events().is_empty());
    }

    #[test]
    fn test_dyn_navigator() {
        let mut gate = PreconditionGate::new();
        let mut recording = RecordingNavigator::new();
        let nav: &mut dyn Navigator = &mut recording;

        gate.render(&redirect_states(), nav, ok_content);
        assert_eq!(recording.count(), 1);
    }

    #[test]
    fn test_phase_serializes_with_tag() {
        let value = serde_json::to_value(GatePhase::Redirecting {
            target: route("/a"),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"phase": "redirecting", "target": "/a"}));
    }

    // Red Team Tests
    mod red_team {
        use super::*;

        #[test]
        fn red_team_flapping_rerenders_do_not_loop_navigation() {
            let mut gate = PreconditionGate::new();
            let mut nav = RecordingNavigator::new();

            for _ in 0..1000 {
                gate.render(&redirect_states(), &mut nav, ok_content);
            }

            assert_eq!(nav.count(), 1);
        }

        #[test]
        fn red_team_unsatisfied_but_loading_never_redirects() {
            let mut gate = PreconditionGate::new();
            let mut nav = RecordingNavigator::new();
            let states = vec![
                PreconditionState::unsatisfied("auth", route("/")),
                PreconditionState::unloaded("repo", route("/contribution")),
            ];

            let view = gate.render(&states, &mut nav, ok_content);

            assert!(view.is_loading());
            assert_eq!(nav.count(), 0);
        }

        #[test]
        fn red_team_content_never_rendered_when_unsatisfied() {
            let mut gate = PreconditionGate::new();
            let mut nav = RecordingNavigator::new();
            let rendered = Cell::new(false);

            gate.render(&redirect_states(), &mut nav, || {
                rendered.set(true);
                Ok::<_, String>(())
            });

            assert!(!rendered.get());
        }

        #[test]
        fn red_team_later_target_cannot_preempt_earlier() {
            let mut gate = PreconditionGate::new();
            let mut nav = RecordingNavigator::new();
            let states = vec![
                PreconditionState::satisfied("auth", route("/")),
                PreconditionState::unsatisfied("repo", route("/contribution")),
                PreconditionState::unsatisfied("admin", route("/admin-only")),
            ];

            gate.render(&states, &mut nav, ok_content);

            assert_eq!(nav.history(), &[route("/contribution")]);
        }

        #[test]
        fn red_team_retry_without_error_is_harmless() {
            let mut gate = PreconditionGate::new();
            let mut nav = RecordingNavigator::new();

            gate.render(&ready_states(), &mut nav, ok_content);
            gate.retry();
            let view = gate.render(&ready_states(), &mut nav, ok_content);

            assert_eq!(view, GateView::Content("insights"));
            assert_eq!(nav.count(), 0);
        }
    }
}
