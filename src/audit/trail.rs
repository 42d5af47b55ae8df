//! In-memory audit trail recorder.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::AuditEvent;

/// Audit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether the pipeline records decisions at all
    pub enabled: bool,
    /// Maximum events kept; the oldest are dropped first. `None` is unbounded.
    pub capacity: Option<usize>,
}

/// Events kept by a default trail.
pub const DEFAULT_CAPACITY: usize = 10_000;

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: Some(DEFAULT_CAPACITY),
        }
    }
}

/// Bounded in-memory recorder for audit events.
///
/// Safe to share between concurrent requests behind an `Arc`. Storage grows
/// with the events actually recorded; the capacity only caps it.
///
/// # Example
///
/// ```
/// use request_guard::audit::{AuditTrail, AuditEvent, AuditEventKind, AuditOutcome};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new(
///     "req-123",
///     Some("user-1"),
///     "users.list",
///     AuditEventKind::Authorization,
///     AuditOutcome::Allowed,
/// ));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: Option<usize>,
}

impl AuditTrail {
    /// Creates a trail that keeps the [`DEFAULT_CAPACITY`] most recent events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a trail that keeps at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: Some(capacity),
        }
    }

    /// Creates a trail that never evicts. Memory grows for as long as the
    /// trail lives, so keep it to tests and short-lived tools.
    pub fn unbounded() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: None,
        }
    }

    /// Creates a trail from settings.
    pub fn from_config(config: &AuditConfig) -> Self {
        match config.capacity {
            Some(capacity) => Self::with_capacity(capacity),
            None => Self::unbounded(),
        }
    }

    /// Returns the eviction limit, or `None` if the trail is unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Records an event, evicting the oldest one when full.
    pub fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while events.len() >= capacity {
                events.pop_front();
            }
        }
        events.push_back(event);
    }

    /// Returns a snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
