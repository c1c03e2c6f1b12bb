//! # lpedit-types
//!
//! Shared type definitions for the pedal board editor.
//! This crate holds the value model mirrored from the backend, the event and
//! command vocabularies exchanged with it, and the pure reducers that merge
//! incoming events into a session's state. It is used by lpedit-core,
//! lpedit-net and the CLI.

pub mod command;
pub mod dispatch;
pub mod event;
pub mod reduce;
pub mod state;

pub use command::BackendCommand;
pub use dispatch::Backend;
pub use event::{DecodeError, EventKind, NamedEvent, PodEvent};
pub use reduce::{reduce_event, Reduced, UpsertOutcome};

// Re-export all state types at crate root for convenience
pub use state::*;

/// Identifier of a set, which is also its expected position in `Pod::sets`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct SetId(usize);

impl SetId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a preset within its set; expected to equal its position.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct PresetId(usize);

impl PresetId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PresetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a parameter within a preset's parameter list (0-based).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ParameterId(usize);

impl ParameterId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ParameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter positions the front panel addresses directly.
pub mod well_known {
    use super::ParameterId;

    pub const INPUT_1_SOURCE: ParameterId = ParameterId(0);
    pub const INPUT_2_SOURCE: ParameterId = ParameterId(1);
    pub const GUITAR_IN_Z: ParameterId = ParameterId(2);
    pub const TEMPO: ParameterId = ParameterId(3);
}
