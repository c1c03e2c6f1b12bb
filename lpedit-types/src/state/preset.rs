//! Presets and the per-stage metadata they carry.

use serde::{Deserialize, Serialize};

use super::parameter::{null_as_empty, Parameter};
use crate::{ParameterId, PresetId, SetId};

/// On/off flag of one stage in the effect chain. Position is identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedalBoardItem {
    pub active: bool,
}

/// Static descriptive metadata for a stage (amp/DT topology). Never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dt {
    pub id: i32,
    pub amp_id: i32,
    pub class: String,
    pub mode: String,
    pub topology: String,
}

/// A single named configuration within a set.
///
/// `set_id` is a back-reference to the owning set, not an ownership edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preset {
    pub id: PresetId,
    pub id_str: String,
    pub name: String,
    pub set_id: SetId,
    #[serde(deserialize_with = "null_as_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<PedalBoardItem>,
    #[serde(deserialize_with = "null_as_empty")]
    pub dts: Vec<Dt>,
}

impl Preset {
    pub fn new(id: PresetId, set_id: SetId, name: &str) -> Self {
        Self {
            id,
            set_id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn parameter(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.get(id.get())
    }

    pub fn parameter_mut(&mut self, id: ParameterId) -> Option<&mut Parameter> {
        self.parameters.get_mut(id.get())
    }

    /// Number of stages currently switched on.
    pub fn active_stage_count(&self) -> usize {
        self.items.iter().filter(|item| item.active).count()
    }
}
