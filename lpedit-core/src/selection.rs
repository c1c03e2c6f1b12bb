//! Derived views over the canonical pod.
//!
//! The device's active (set, preset) lives in the pod itself. What the
//! operator is browsing is tracked separately by [`ViewCursor`], which follows
//! the device's set until the operator picks another one.

use lpedit_types::{Pod, Preset, SetId};

/// The preset the device has active, or `None` unless both selection slots
/// are set and resolve.
pub fn current_preset(pod: &Pod) -> Option<Preset> {
    pod.current_preset().cloned()
}

/// Which set the operator is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCursor {
    viewed_set: Option<SetId>,
    device_set: Option<SetId>,
}

impl ViewCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every new snapshot. The cursor moves with the device only
    /// when the device's set changes, or when the browsed set is gone.
    pub fn sync_with(&mut self, pod: &Pod) {
        let device_set = pod.current_set().map(|set| set.id);
        let viewed_known = self
            .viewed_set
            .is_some_and(|id| pod.sets.iter().any(|set| set.id == id));
        if device_set != self.device_set || !viewed_known {
            self.viewed_set = device_set;
        }
        self.device_set = device_set;
    }

    /// Browse a set without changing the device's selection. Ignored if the
    /// set is not known yet.
    pub fn view_set(&mut self, pod: &Pod, id: SetId) -> bool {
        if pod.sets.iter().any(|set| set.id == id) {
            self.viewed_set = Some(id);
            true
        } else {
            false
        }
    }

    pub fn viewed_set(&self) -> Option<SetId> {
        self.viewed_set
    }

    /// Presets of the browsed set, looked up by the set's own id.
    pub fn viewed_presets<'a>(&self, pod: &'a Pod) -> &'a [Preset] {
        self.viewed_set
            .and_then(|id| pod.sets.iter().find(|set| set.id == id))
            .map(|set| set.presets.as_slice())
            .unwrap_or(&[])
    }
}
