//! GateAuditLog - Audit trail of gate transitions and navigations

use gate::{GateEvent, GatePhase};
use serde::{Deserialize, Serialize};
use shared::RoutePath;
use std::collections::VecDeque;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    pub route: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
}

/// Types of audit events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Transition,
    Navigation,
    RenderFailure,
    Retry,
}

/// Bounded audit log; oldest entries are dropped first
#[derive(Debug)]
pub struct GateAuditLog {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
}

impl GateAuditLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Append an entry
    pub fn log(&mut self, entry: AuditEntry) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Record a gate event
    pub fn record(&mut self, event: &GateEvent) {
        let entry = match event {
            GateEvent::Transitioned { route, from, to } => AuditEntry {
                event_type: AuditEventType::Transition,
                from: Some(from.to_string()),
                to: Some(to.to_string()),
                ..Self::blank(route)
            },
            GateEvent::Navigated { route, target } => AuditEntry {
                event_type: AuditEventType::Navigation,
                target: Some(target.to_string()),
                ..Self::blank(route)
            },
            GateEvent::RenderFailed { route, message } => AuditEntry {
                event_type: AuditEventType::RenderFailure,
                message: Some(message.clone()),
                ..Self::blank(route)
            },
            GateEvent::Retried { route } => AuditEntry {
                event_type: AuditEventType::Retry,
                to: Some(GatePhase::Pending.to_string()),
                ..Self::blank(route)
            },
        };
        self.log(entry);
    }

    /// Record every event in order
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GateEvent>) {
        for event in events {
            self.record(event);
        }
    }

    fn blank(route: &Option<RoutePath>) -> AuditEntry {
        AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::Transition,
            route: route.as_ref().map(|r| r.to_string()),
            from: None,
            to: None,
            target: None,
            message: None,
        }
    }

    /// Most recent first
    pub fn get_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Most recent navigations first
    pub fn get_recent_navigations(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.event_type == AuditEventType::Navigation)
            .take(limit)
            .collect()
    }

    pub fn get_stats(&self) -> AuditStats {
        let count = |kind: AuditEventType| self.entries.iter().filter(|e| e.event_type == kind).count();

        AuditStats {
            total_entries: self.entries.len(),
            navigation_count: count(AuditEventType::Navigation),
            failure_count: count(AuditEventType::RenderFailure),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Audit statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total_entries: usize,
    pub navigation_count: usize,
    pub failure_count: usize,
}

impl Default for GateAuditLog {
    fn default() -> Self {
        Self::new(10000)
    }
}
