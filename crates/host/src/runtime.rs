//! Re-render loop driven by context changes

use gate::{GateView, Navigator};
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

use crate::page::GuardedPage;

/// Render, then wait for the next change, until the view settles.
///
/// Settled means anything but the loading indicator: content, an error
/// panel, or a navigation away. Also returns the last view if the change
/// feed closes while still loading.
pub async fn run_until_settled<T, E, F, N>(
    page: &mut GuardedPage,
    changes: &mut watch::Receiver<u64>,
    navigator: &mut N,
    mut render: F,
) -> GateView<T>
where
    E: fmt::Display,
    F: FnMut() -> Result<T, E>,
    N: Navigator + ?Sized,
{
    loop {
        // Mark the current revision seen before reading the sources
        let revision = *changes.borrow_and_update();
        let view = page.render(navigator, &mut render);

        if !view.is_loading() {
            debug!(route = %page.route(), revision, "View settled");
            return view;
        }

        if changes.changed().await.is_err() {
            debug!(route = %page.route(), revision, "Change feed closed while loading");
            return view;
        }
    }
}
