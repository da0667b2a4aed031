//! GuardedPage - One route, its preconditions, gate and audit trail

use audit::GateAuditLog;
use gate::{GateView, GuardTable, Navigator, PreconditionGate, PreconditionSet};
use shared::{GateResult, PreconditionState, RoutePath};
use std::fmt;

const AUDIT_CAPACITY: usize = 1000;

/// A page whose content is only rendered once its preconditions hold
#[derive(Debug)]
pub struct GuardedPage {
    route: RoutePath,
    preconditions: PreconditionSet,
    gate: PreconditionGate,
    audit: GateAuditLog,
}

impl GuardedPage {
    pub fn new(
        route: RoutePath,
        preconditions: PreconditionSet,
        loading_message: impl Into<String>,
    ) -> Self {
        let gate = PreconditionGate::new()
            .with_route(route.clone())
            .with_loading_message(loading_message);

        Self {
            route,
            preconditions,
            gate,
            audit: GateAuditLog::new(AUDIT_CAPACITY),
        }
    }

    /// Page for a route guarded by the table, `None` if the route is open
    pub fn from_table(table: &GuardTable, route: &RoutePath) -> Option<Self> {
        table.gate_for(route).map(|(gate, preconditions)| Self {
            route: route.clone(),
            preconditions,
            gate,
            audit: GateAuditLog::new(AUDIT_CAPACITY),
        })
    }

    pub fn route(&self) -> &RoutePath {
        &self.route
    }

    pub fn preconditions(&self) -> &PreconditionSet {
        &self.preconditions
    }

    pub fn gate(&self) -> &PreconditionGate {
        &self.gate
    }

    pub fn audit(&self) -> &GateAuditLog {
        &self.audit
    }

    /// Fresh read of every source
    pub fn snapshot(&self) -> Vec<PreconditionState> {
        self.preconditions.snapshot()
    }

    /// Re-render against the current source state
    pub fn render<T, E, F, N>(&mut self, navigator: &mut N, render: F) -> GateView<T>
    where
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
        N: Navigator + ?Sized,
    {
        let states = self.snapshot();
        let view = self.gate.render(&states, navigator, render);
        self.flush_events();
        view
    }

    /// The "Try Again" action
    pub fn retry(&mut self) -> GateResult {
        let result = self.gate.retry();
        self.flush_events();
        result
    }

    fn flush_events(&mut self) {
        let events = self.gate.drain_events();
        self.audit.record_all(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate::{RecordingNavigator, StaticSource};
    use shared::GuardConfig;
    use std::sync::Arc;

    fn page(auth: StaticSource, repo: StaticSource) -> GuardedPage {
        let preconditions = PreconditionSet::new()
            .with("authentication", RoutePath::root(), Arc::new(auth))
            .with(
                "repository-selected",
                RoutePath::parse("/contribution").unwrap(),
                Arc::new(repo),
            );
        GuardedPage::new(
            RoutePath::parse("/contribution/insights").unwrap(),
            preconditions,
            "Loading insights...",
        )
    }

    #[test]
    fn test_render_records_audit_trail() {
        let mut page = page(StaticSource::new(true, true), StaticSource::new(true, false));
        let mut nav = RecordingNavigator::new();

        page.render(&mut nav, || Ok::<_, String>(()));
        page.render(&mut nav, || Ok::<_, String>(()));

        let stats = page.audit().get_stats();
        assert_eq!(stats.navigation_count, 1);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(nav.history(), &[RoutePath::parse("/contribution").unwrap()]);
    }

    #[test]
    fn test_retry_is_audited() {
        let mut page = page(StaticSource::new(true, true), StaticSource::new(true, true));
        let mut nav = RecordingNavigator::new();

        let view: GateView<()> = page.render(&mut nav, || Err("boom"));
        assert!(matches!(view, GateView::Failed(_)));

        assert_eq!(page.retry(), GateResult::Pending);
        let view = page.render(&mut nav, || Ok::<_, String>("insights"));
        assert_eq!(view.content(), Some(&"insights"));

        let stats = page.audit().get_stats();
        assert_eq!(stats.failure_count, 1);
        assert!(page
            .audit()
            .get_recent(10)
            .iter()
            .any(|e| e.event_type == audit::AuditEventType::Retry));
    }

    #[test]
    fn test_from_table() {
        let mut registry = gate::SourceRegistry::new();
        registry.register("authentication", Arc::new(StaticSource::new(false, false)));
        registry.register("repository-selected", Arc::new(StaticSource::new(false, false)));
        let table = GuardTable::from_config(&GuardConfig::default(), &registry).unwrap();

        let insights = RoutePath::parse("/contribution/insights").unwrap();
        let mut page = GuardedPage::from_table(&table, &insights).unwrap();
        assert_eq!(page.route(), &insights);

        let view = page.render(&mut RecordingNavigator::new(), || Ok::<_, String>(()));
        assert!(view.is_loading());

        let open = RoutePath::parse("/contribution/why").unwrap();
        assert!(GuardedPage::from_table(&table, &open).is_none());
    }
}
