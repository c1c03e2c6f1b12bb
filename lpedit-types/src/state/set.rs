use serde::{Deserialize, Serialize};

use super::parameter::null_as_empty;
use super::preset::Preset;
use crate::{PresetId, SetId};

/// A named bank of presets, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Set {
    pub id: SetId,
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub presets: Vec<Preset>,
}

impl Set {
    pub fn new(id: SetId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            presets: Vec::new(),
        }
    }

    /// Empty stand-in created when a preset references a set not yet received.
    pub fn placeholder(id: SetId) -> Self {
        Self::new(id, "")
    }

    pub fn preset(&self, id: PresetId) -> Option<&Preset> {
        self.presets.get(id.get())
    }
}
