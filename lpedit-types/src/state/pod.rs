//! Root aggregate for one connected device session.

use serde::{Deserialize, Serialize};

use super::parameter::null_as_empty;
use super::preset::Preset;
use super::set::Set;
use crate::{PresetId, SetId};

/// All sets of the connected device plus the device's active selection.
///
/// `current_set_id` and `current_preset_id` are slot indices into `sets` and
/// `sets[current_set_id].presets`. They coincide with the entities' own ids
/// whenever events arrive in contiguous order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pod {
    #[serde(deserialize_with = "null_as_empty")]
    pub sets: Vec<Set>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_set_id: Option<SetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_preset_id: Option<PresetId>,
}

impl Pod {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: SetId) -> Option<&Set> {
        self.sets.get(id.get())
    }

    pub fn current_set(&self) -> Option<&Set> {
        self.set(self.current_set_id?)
    }

    /// The preset the device has active, if both selection slots resolve.
    pub fn current_preset(&self) -> Option<&Preset> {
        self.current_set()?.preset(self.current_preset_id?)
    }

    pub fn current_preset_mut(&mut self) -> Option<&mut Preset> {
        let set = self.current_set_id?.get();
        let preset = self.current_preset_id?.get();
        self.sets.get_mut(set)?.presets.get_mut(preset)
    }

    pub fn preset_count(&self) -> usize {
        self.sets.iter().map(|s| s.presets.len()).sum()
    }
}
