//! Session-level state: connection status plus the canonical pod.

use serde::{Deserialize, Serialize};

use super::pod::Pod;

/// Everything the synchronizer owns for one device session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Whether a device session is active (`start` seen, no `stop` since).
    pub is_started: bool,
    /// Initialization progress in percent while the backend loads the device.
    pub progress: Option<i32>,
    /// Error reported by the last abnormal stop; cleared by the next start.
    pub stop_error: Option<String>,
    pub pod: Pod,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
