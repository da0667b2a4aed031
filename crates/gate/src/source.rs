//! Precondition sources and ordered precondition sets

use shared::{PreconditionState, RoutePath};
use std::fmt;
use std::sync::Arc;

/// Readable state of an externally owned precondition (auth, repository, ...)
///
/// The gate only reads through this trait. Owners mutate their own state and
/// notify the host through whatever reactive mechanism the host uses.
pub trait PreconditionSource: Send + Sync {
    /// Initial resolution finished
    fn is_loaded(&self) -> bool;

    /// The precondition holds. Only meaningful once loaded.
    fn is_satisfied(&self) -> bool;
}

/// A fixed source, handy for tests and static guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSource {
    pub loaded: bool,
    pub satisfied: bool,
}

impl StaticSource {
    pub fn new(loaded: bool, satisfied: bool) -> Self {
        Self { loaded, satisfied }
    }
}

impl PreconditionSource for StaticSource {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn is_satisfied(&self) -> bool {
        self.satisfied
    }
}

/// A named source bound to its redirect target
#[derive(Clone)]
pub struct Precondition {
    pub name: String,
    pub on_unsatisfied: RoutePath,
    source: Arc<dyn PreconditionSource>,
}

impl Precondition {
    pub fn new(
        name: impl Into<String>,
        on_unsatisfied: RoutePath,
        source: Arc<dyn PreconditionSource>,
    ) -> Self {
        Self {
            name: name.into(),
            on_unsatisfied,
            source,
        }
    }

    /// Read the source now
    pub fn snapshot(&self) -> PreconditionState {
        let is_loaded = self.source.is_loaded();
        PreconditionState {
            name: self.name.clone(),
            is_loaded,
            is_satisfied: is_loaded && self.source.is_satisfied(),
            on_unsatisfied: self.on_unsatisfied.clone(),
        }
    }
}

impl fmt::Debug for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Precondition")
            .field("name", &self.name)
            .field("on_unsatisfied", &self.on_unsatisfied)
            .finish_non_exhaustive()
    }
}

/// Preconditions in declaration order
#[derive(Debug, Clone, Default)]
pub struct PreconditionSet {
    entries: Vec<Precondition>,
}

impl PreconditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, precondition: Precondition) {
        self.entries.push(precondition);
    }

    /// Builder form of `push`
    pub fn with(
        mut self,
        name: impl Into<String>,
        on_unsatisfied: RoutePath,
        source: Arc<dyn PreconditionSource>,
    ) -> Self {
        self.push(Precondition::new(name, on_unsatisfied, source));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Precondition> {
        self.entries.iter()
    }

    /// Fresh snapshot of every source, in declaration order
    pub fn snapshot(&self) -> Vec<PreconditionState> {
        self.entries.iter().map(Precondition::snapshot).collect()
    }
}
