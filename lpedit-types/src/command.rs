//! Outbound requests sent to the backend.
//!
//! All commands are fire-and-forget: the backend confirms by emitting the
//! matching change event, never by replying to the command itself.

use serde::{Deserialize, Serialize};

use crate::{ParameterId, PresetId, SetId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendCommand {
    /// Change a parameter of the device's active preset.
    SetParameterValue {
        parameter_id: ParameterId,
        value: String,
    },
    /// Ask the device to switch its active preset.
    SetPreset { preset_id: PresetId, set_id: SetId },
    /// Open a session on the given device.
    Start { device: String },
    /// Close the current session.
    Stop,
    /// Persist the active preset on the device.
    SavePreset,
    /// Discard unsaved edits by reloading the active preset.
    ReloadPreset,
    /// Request the list of attached devices.
    ListDevices,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SetParameterValue { .. } => "setParameterValue",
            BackendCommand::SetPreset { .. } => "setPreset",
            BackendCommand::Start { .. } => "start",
            BackendCommand::Stop => "stop",
            BackendCommand::SavePreset => "savePreset",
            BackendCommand::ReloadPreset => "reloadPreset",
            BackendCommand::ListDevices => "listDevices",
        }
    }
}
