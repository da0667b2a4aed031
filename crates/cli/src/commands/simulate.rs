//! beetle-gate simulate command

use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::scenario::{replay, Scenario, ScenarioReport, ViewSummary};

#[derive(Debug, Args)]
pub struct SimulateCommand {
    /// Scenario file (YAML or JSON)
    pub scenario: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl SimulateCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let scenario = Scenario::from_file(&self.scenario)?;
        let report = replay(&scenario);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        if !report.passed() {
            anyhow::bail!(
                "scenario '{}' failed {} expectation(s)",
                report.name,
                report.mismatches.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &ScenarioReport) {
    println!("Scenario: {}", style(&report.name).bold());

    for step in &report.steps {
        let shown = match &step.view {
            Some(ViewSummary::Loading { message }) => format!("loading ({})", message),
            Some(ViewSummary::Navigating { target }) => format!("navigating to {}", target),
            Some(ViewSummary::Failed { message }) => format!("error panel: {}", message),
            Some(ViewSummary::Content { content }) => format!("content: {}", content),
            None => "retry".to_string(),
        };
        let fired = step
            .navigated
            .as_ref()
            .map(|t| format!("  {} navigate({})", style("⇢").cyan(), t))
            .unwrap_or_default();

        println!("  [{}] {:<7} {:<12} {}{}", step.index, step.action, step.phase.name(), shown, fired);
    }

    println!(
        "Navigations: {}  Failures: {}  Audit entries: {}",
        report.navigations.len(),
        report.audit.failure_count,
        report.audit.total_entries
    );

    for mismatch in &report.mismatches {
        println!("  {} {}", style("✗").red(), mismatch);
    }
}
