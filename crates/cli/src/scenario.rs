//! Scenario files: scripted precondition snapshots replayed through a gate

use audit::{AuditStats, GateAuditLog};
use gate::{GatePhase, GateView, PreconditionGate, RecordingNavigator};
use serde::{Deserialize, Serialize};
use shared::{GateError, GateResult, PreconditionState, RoutePath, DEFAULT_LOADING_MESSAGE};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Scenario loading errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario '{0}' has no steps")]
    Empty(String),

    #[error(transparent)]
    Gate(#[from] GateError),
}

/// A scripted sequence of gate inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,

    /// Route being guarded (for logs and events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RoutePath>,

    #[serde(default = "default_loading_message")]
    pub loading_message: String,

    /// Text the content callback produces when it succeeds
    #[serde(default = "default_content")]
    pub content: String,

    pub steps: Vec<ScenarioStep>,
}

fn default_name() -> String {
    "scenario".to_string()
}

fn default_loading_message() -> String {
    DEFAULT_LOADING_MESSAGE.to_string()
}

fn default_content() -> String {
    "content".to_string()
}

/// One re-render or one retry click
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    Render {
        preconditions: Vec<PreconditionState>,

        /// Make the content callback fail with this message
        #[serde(default, rename = "renderError", skip_serializing_if = "Option::is_none")]
        render_error: Option<String>,

        /// Expected gate decision for this step
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect: Option<GateResult>,
    },
    Retry,
}

impl Scenario {
    /// Load a scenario from a YAML or JSON file (by extension)
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(GateError::from)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let scenario: Self = if is_json {
            serde_json::from_str(&content).map_err(GateError::from)?
        } else {
            serde_yaml::from_str(&content).map_err(GateError::from)?
        };

        if scenario.steps.is_empty() {
            return Err(ScenarioError::Empty(scenario.name));
        }
        Ok(scenario)
    }
}

/// What a step displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewSummary {
    Loading { message: String },
    Navigating { target: RoutePath },
    Failed { message: String },
    Content { content: String },
}

impl ViewSummary {
    fn from_view(view: GateView<String>) -> Self {
        match view {
            GateView::Loading { message } => ViewSummary::Loading { message },
            GateView::Navigating { target } => ViewSummary::Navigating { target },
            GateView::Failed(panel) => ViewSummary::Failed {
                message: panel.message,
            },
            GateView::Content(content) => ViewSummary::Content { content },
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub phase: GatePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigated: Option<RoutePath>,
}

/// Outcome of a whole scenario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
    pub navigations: Vec<RoutePath>,
    pub mismatches: Vec<String>,
    pub audit: AuditStats,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Run every step through one gate with a recording navigator
pub fn replay(scenario: &Scenario) -> ScenarioReport {
    let mut gate = PreconditionGate::new().with_loading_message(scenario.loading_message.clone());
    if let Some(route) = &scenario.route {
        gate = gate.with_route(route.clone());
    }
    let mut nav = RecordingNavigator::new();
    let mut audit = GateAuditLog::default();
    let mut steps = Vec::with_capacity(scenario.steps.len());
    let mut mismatches = Vec::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        let fired_before = nav.count();

        let (action, view) = match step {
            ScenarioStep::Render {
                preconditions,
                render_error,
                expect,
            } => {
                let actual = gate.evaluate(preconditions);
                if let Some(expected) = expect {
                    if expected != &actual {
                        mismatches.push(format!(
                            "step {}: expected {}, got {}",
                            index, expected, actual
                        ));
                    }
                }

                let view = gate.render(preconditions, &mut nav, || match render_error {
                    Some(message) => Err(message.clone()),
                    None => Ok(scenario.content.clone()),
                });
                ("render", Some(ViewSummary::from_view(view)))
            }
            ScenarioStep::Retry => {
                gate.retry();
                ("retry", None)
            }
        };

        audit.record_all(&gate.drain_events());
        let navigated = nav.history().get(fired_before).cloned();
        debug!(index, action, phase = %gate.current(), "Scenario step replayed");

        steps.push(StepReport {
            index,
            action,
            phase: gate.current().clone(),
            view,
            navigated,
        });
    }

    ScenarioReport {
        name: scenario.name.clone(),
        steps,
        navigations: nav.history().to_vec(),
        mismatches,
        audit: audit.get_stats(),
    }
}
