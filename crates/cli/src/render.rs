//! Terminal rendering of gate views

use console::style;
use gate::GateView;
use std::fmt::Display;

/// One-line description of a view
pub fn describe_view<T: Display>(view: &GateView<T>) -> String {
    match view {
        GateView::Loading { message } => format!("{} {}", style("…").dim(), message),
        GateView::Navigating { target } => {
            format!("{} navigating to {}", style("→").cyan(), style(target).bold())
        }
        GateView::Failed(panel) => format!(
            "{} {}  [{}]",
            style("Error").red().bold(),
            panel.message,
            style(&panel.retry_label).underlined()
        ),
        GateView::Content(content) => format!("{} {}", style("✓").green(), content),
    }
}
