use crate::{Pod, SessionState};

use super::Reduced;

pub(super) fn start(state: &mut SessionState) -> Reduced {
    state.is_started = true;
    state.stop_error = None;
    state.pod = Pod::new();
    Reduced::Session
}

/// A stop without an error keeps the previous error visible; only the next
/// start clears it.
pub(super) fn stop(state: &mut SessionState, error: Option<&str>) -> Reduced {
    if let Some(err) = error {
        state.stop_error = Some(err.to_string());
    }
    state.is_started = false;
    state.progress = None;
    state.pod = Pod::new();
    Reduced::Session
}

pub(super) fn progress(state: &mut SessionState, percent: i32) -> Reduced {
    state.progress = Some(percent);
    Reduced::Progress
}

pub(super) fn init_done(state: &mut SessionState) -> Reduced {
    state.progress = None;
    Reduced::Progress
}
