//! Immutable view of the session handed to observers.

use lpedit_types::{Pod, Preset, SessionState};

use crate::selection;

/// One consistent reading of the session.
///
/// `current_preset` is derived from `pod` when the snapshot is built, so the
/// two can never disagree. Snapshots are shared as `Arc<PodSnapshot>`; a new
/// `Arc` is published for every change, so `Arc::ptr_eq` detects changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodSnapshot {
    pub is_started: bool,
    pub progress: Option<i32>,
    pub stop_error: Option<String>,
    pub pod: Pod,
    pub current_preset: Option<Preset>,
    /// Increases by one with every published snapshot.
    pub revision: u64,
}

impl PodSnapshot {
    pub fn from_state(state: &SessionState, revision: u64) -> Self {
        Self {
            is_started: state.is_started,
            progress: state.progress,
            stop_error: state.stop_error.clone(),
            current_preset: selection::current_preset(&state.pod),
            pod: state.pod.clone(),
            revision,
        }
    }

    /// One-line status used by log output and the CLI.
    pub fn summary(&self) -> String {
        let status = if self.is_started { "started" } else { "stopped" };
        let mut line = format!(
            "#{} {} sets={} presets={}",
            self.revision,
            status,
            self.pod.sets.len(),
            self.pod.preset_count()
        );
        if let Some(p) = self.progress {
            line.push_str(&format!(" progress={}%", p));
        }
        if let Some(preset) = &self.current_preset {
            line.push_str(&format!(" current={}:{} '{}'", preset.set_id, preset.id, preset.name));
        }
        if let Some(err) = &self.stop_error {
            line.push_str(&format!(" error='{}'", err));
        }
        line
    }
}
