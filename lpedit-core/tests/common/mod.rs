#![allow(dead_code)]
//! Fixtures shared by lpedit-core integration tests.

use lpedit_core::{PodController, RecordingBackend, ServiceOptions};
use lpedit_types::{Parameter, ParameterId, PodEvent, Preset, PresetId, Set, SetId};

pub fn controller() -> PodController<RecordingBackend> {
    PodController::new(RecordingBackend::new(), ServiceOptions::default())
}

pub fn set(id: usize, name: &str) -> Set {
    Set::new(SetId::new(id), name)
}

/// Preset laid out like the device's front panel: three input selectors
/// followed by the tempo.
pub fn panel_preset(id: usize, set_id: usize, name: &str) -> Preset {
    let mut preset = Preset::new(PresetId::new(id), SetId::new(set_id), name);
    preset.parameters = vec![
        Parameter::enumerated(ParameterId::new(0), "Input 1 Source", "Guitar", &["Guitar", "Mic", "Variax"]),
        Parameter::enumerated(ParameterId::new(1), "Input 2 Source", "Same", &["Same", "Mic"]),
        Parameter::enumerated(ParameterId::new(2), "Guitar In-Z", "Auto", &["Auto", "1M", "230k"]),
        Parameter::numeric(ParameterId::new(3), "Tempo", 120.0, 40, 220),
    ];
    preset
}

pub fn tempo_echo(value: &str) -> PodEvent {
    let mut p = Parameter::numeric(ParameterId::new(3), "Tempo", 0.0, 40, 220);
    p.assign(value);
    PodEvent::ParameterChange(p)
}
