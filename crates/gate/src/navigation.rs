//! Navigation capability supplied by the host

use shared::RoutePath;

/// Host navigation (router push)
pub trait Navigator {
    fn navigate_to(&mut self, target: &RoutePath);
}

impl<F> Navigator for F
where
    F: FnMut(&RoutePath),
{
    fn navigate_to(&mut self, target: &RoutePath) {
        self(target)
    }
}

/// Records every navigation instead of performing it
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    history: Vec<RoutePath>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[RoutePath] {
        &self.history
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }

    pub fn last(&self) -> Option<&RoutePath> {
        self.history.last()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, target: &RoutePath) {
        self.history.push(target.clone());
    }
}
