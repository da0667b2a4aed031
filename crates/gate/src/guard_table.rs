//! GuardTable - Route guards built from configuration

use shared::{GateError, GuardConfig, Result, RoutePath};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::gate::PreconditionGate;
use crate::source::{Precondition, PreconditionSet, PreconditionSource};

/// Named precondition sources available to route guards
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn PreconditionSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under a name (replaces any previous one)
    pub fn register(&mut self, name: impl Into<String>, source: Arc<dyn PreconditionSource>) {
        self.sources.insert(name.into(), source);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PreconditionSource>> {
        self.sources.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sources.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct RouteGuard {
    pattern: String,
    loading_message: String,
    preconditions: PreconditionSet,
}

/// Route patterns mapped to their ordered preconditions
#[derive(Debug, Clone, Default)]
pub struct GuardTable {
    guards: Vec<RouteGuard>,
}

impl GuardTable {
    /// Bind every configured precondition to a registered source
    pub fn from_config(config: &GuardConfig, registry: &SourceRegistry) -> Result<Self> {
        config.validate()?;

        let mut guards = Vec::with_capacity(config.routes.len());
        for route in &config.routes {
            let mut preconditions = PreconditionSet::new();
            for spec in &route.preconditions {
                let source = registry
                    .get(&spec.name)
                    .ok_or_else(|| GateError::UnknownPrecondition {
                        route: route.path.clone(),
                        name: spec.name.clone(),
                    })?;
                preconditions.push(Precondition::new(
                    spec.name.clone(),
                    spec.redirect.clone(),
                    source,
                ));
            }

            debug!(route = %route.path, preconditions = ?preconditions.names(), "Route guard registered");
            guards.push(RouteGuard {
                pattern: route.path.clone(),
                loading_message: config.loading_message_for(route),
                preconditions,
            });
        }

        Ok(Self { guards })
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Preconditions of the first matching guard, `None` if unguarded
    pub fn preconditions_for(&self, path: &RoutePath) -> Option<PreconditionSet> {
        self.guard_for(path).map(|g| g.preconditions.clone())
    }

    /// A fresh gate plus its preconditions for a path
    pub fn gate_for(&self, path: &RoutePath) -> Option<(PreconditionGate, PreconditionSet)> {
        self.guard_for(path).map(|g| {
            let gate = PreconditionGate::new()
                .with_route(path.clone())
                .with_loading_message(g.loading_message.clone());
            (gate, g.preconditions.clone())
        })
    }

    fn guard_for(&self, path: &RoutePath) -> Option<&RouteGuard> {
        self.guards
            .iter()
            .find(|g| shared::route_matches(&g.pattern, path.as_str()))
    }
}
