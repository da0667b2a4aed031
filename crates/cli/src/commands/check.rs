//! beetle-gate check command

use clap::Args;
use shared::{GuardConfig, RoutePath};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Route to check
    #[arg(short, long)]
    pub route: String,

    /// Guard configuration (defaults to the built-in insights guard)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => GuardConfig::from_file(path)?,
            None => GuardConfig::default(),
        };
        let route = RoutePath::parse(&self.route)?;

        let guard = config.route_for(route.as_str());
        if self.json {
            let value = serde_json::json!({
                "route": route,
                "guarded": guard.is_some(),
                "pattern": guard.map(|g| g.path.clone()),
                "preconditions": guard.map(|g| g.preconditions.clone()).unwrap_or_default(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        match guard {
            Some(guard) => {
                println!("Route {} is guarded by '{}':", route, guard.path);
                for (i, spec) in guard.preconditions.iter().enumerate() {
                    println!("  {}. {} (otherwise -> {})", i + 1, spec.name, spec.redirect);
                }
                println!("Loading message: {}", config.loading_message_for(guard));
            }
            None => println!("Route {} is not guarded", route),
        }
        Ok(())
    }
}
