//! Tracking of optimistic edits awaiting the backend's echo.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use lpedit_types::{Parameter, ParameterId, PresetId, SetId};

/// One unconfirmed edit.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    /// Selection the edit was made against.
    pub set: SetId,
    pub preset: PresetId,
    pub requested: String,
    /// Parameter as last confirmed by the backend; restored on expiry.
    pub confirmed: Parameter,
    pub deadline: Instant,
}

pub struct PendingChanges {
    timeout: Duration,
    entries: BTreeMap<ParameterId, PendingChange>,
}

impl PendingChanges {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: BTreeMap::new(),
        }
    }

    /// Remember an edit. A second edit of the same parameter before the echo
    /// keeps the original confirmed value and extends the deadline.
    pub fn record(
        &mut self,
        set: SetId,
        preset: PresetId,
        confirmed: Parameter,
        requested: &str,
        now: Instant,
    ) {
        let deadline = now + self.timeout;
        let id = confirmed.id;
        let entry = self.entries.entry(id).or_insert_with(|| PendingChange {
            set,
            preset,
            requested: String::new(),
            confirmed,
            deadline,
        });
        entry.requested = requested.to_string();
        entry.deadline = deadline;
    }

    /// A backend echo for this parameter settles any pending edit of it.
    pub fn confirm(&mut self, parameter: &Parameter) -> Option<PendingChange> {
        self.entries.remove(&parameter.id)
    }

    /// Remove and return every edit whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<PendingChange> {
        let expired: Vec<ParameterId> = self
            .entries
            .iter()
            .filter(|(_, change)| change.deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, id: ParameterId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: ParameterId) -> Option<&PendingChange> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
