//! beetle-gate insights command
//!
//! Interactive walk through the insights page guard: the contexts resolve
//! in the background, the page re-renders on every change, and a render
//! failure offers the "Try Again" action.

use clap::Args;
use console::style;
use contexts::{AuthContext, ChangeHub, Repository, RepositoryContext};
use dialoguer::Confirm;
use gate::{GateView, RecordingNavigator};
use host::pages::{self, InsightsHeader};
use host::run_until_settled;
use indicatif::{ProgressBar, ProgressStyle};
use shared::{ContentRenderError, INSIGHTS_LOADING_MESSAGE};
use std::cell::Cell;
use std::time::Duration;
use tracing::info;

use crate::render::describe_view;

#[derive(Debug, Clone, Args)]
pub struct InsightsCommand {
    /// Restore auth without a session
    #[arg(long)]
    pub signed_out: bool,

    /// Restore repository selection without a repository
    #[arg(long)]
    pub no_repository: bool,

    /// Make the first content render fail
    #[arg(long)]
    pub fail_render: bool,

    /// Delay before each context resolves
    #[arg(long, default_value_t = 400)]
    pub delay_ms: u64,

    /// Never prompt; leave an error panel as is
    #[arg(long)]
    pub no_input: bool,
}

impl Default for InsightsCommand {
    fn default() -> Self {
        Self {
            signed_out: false,
            no_repository: false,
            fail_render: false,
            delay_ms: 400,
            no_input: false,
        }
    }
}

impl InsightsCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.run_async())
    }

    async fn run_async(&self) -> anyhow::Result<()> {
        let hub = ChangeHub::new();
        let auth = AuthContext::new(hub.clone());
        let repository = RepositoryContext::new(hub.clone());
        let mut changes = hub.subscribe();
        let mut page = pages::insights(&auth, &repository);
        let mut nav = RecordingNavigator::new();

        self.spawn_context_restore(auth.clone(), repository.clone());

        let fail_next = Cell::new(self.fail_render);
        let mut render = || -> Result<InsightsHeader, ContentRenderError> {
            if fail_next.replace(false) {
                return Err(ContentRenderError::new("insights service unavailable"));
            }
            pages::insights_header(&auth, &repository)
        };

        loop {
            let spinner = loading_spinner();
            let view = run_until_settled(&mut page, &mut changes, &mut nav, &mut render).await;
            spinner.finish_and_clear();

            println!("{}", describe_view(&view));

            let retry = match &view {
                GateView::Failed(panel) if self.prompts_allowed(console::user_attended()) => {
                    Confirm::new()
                        .with_prompt(panel.retry_label.clone())
                        .default(true)
                        .interact()?
                }
                GateView::Navigating { target } => {
                    println!("  (would open the {})", pages::describe(target));
                    false
                }
                _ => false,
            };

            if !retry {
                break;
            }
            info!("Retry requested");
            page.retry();
        }

        let stats = page.audit().get_stats();
        println!(
            "{} transitions logged, {} navigation(s), {} failure(s)",
            style(stats.total_entries).bold(),
            stats.navigation_count,
            stats.failure_count
        );
        Ok(())
    }

    /// Prompt only when asked to and someone is at the terminal
    fn prompts_allowed(&self, attended: bool) -> bool {
        !self.no_input && attended
    }

    fn spawn_context_restore(&self, auth: AuthContext, repository: RepositoryContext) {
        let delay = Duration::from_millis(self.delay_ms);
        let signed_out = self.signed_out;
        let no_repository = self.no_repository;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if signed_out {
                auth.sign_out();
            } else {
                auth.sign_in("demo-token", "octocat");
            }

            tokio::time::sleep(delay).await;
            let restored = (!no_repository).then(|| Repository::new("beetle-labs", "beetle"));
            repository.finish_loading(restored);
        });
    }
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(INSIGHTS_LOADING_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
