//! beetle-gate init command

use clap::Args;
use shared::GuardConfig;
use std::path::{Path, PathBuf};

const INSIGHTS_SCENARIO: &str = r#"name: insights-without-repository
route: /contribution/insights
loadingMessage: Loading insights...
content: insights
steps:
  # Contexts still restoring
  - action: render
    preconditions:
      - { name: authentication, isLoaded: false, onUnsatisfied: "/" }
      - { name: repository-selected, isLoaded: false, onUnsatisfied: "/contribution" }
    expect: { state: pending }
  # Signed in, no repository stored
  - action: render
    preconditions:
      - { name: authentication, isLoaded: true, isSatisfied: true, onUnsatisfied: "/" }
      - { name: repository-selected, isLoaded: true, isSatisfied: false, onUnsatisfied: "/contribution" }
    expect: { state: redirecting, target: "/contribution" }
  # Same state re-rendered, no second navigation
  - action: render
    preconditions:
      - { name: authentication, isLoaded: true, isSatisfied: true, onUnsatisfied: "/" }
      - { name: repository-selected, isLoaded: true, isSatisfied: false, onUnsatisfied: "/contribution" }
"#;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Only write guards.yaml, no example scenarios
    #[arg(long)]
    pub minimal: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        println!("Initializing Beetle Gate project in {:?}", self.directory);

        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(
            self.directory.join("guards.yaml"),
            GuardConfig::default().to_yaml()?,
        )?;

        if !self.minimal {
            self.create_example_scenarios(&self.directory.join("scenarios"))?;
        }

        println!("✓ Beetle Gate project initialized");
        Ok(())
    }

    fn create_example_scenarios(&self, scenarios_dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(scenarios_dir)?;
        std::fs::write(scenarios_dir.join("insights.yaml"), INSIGHTS_SCENARIO)?;
        Ok(())
    }
}
