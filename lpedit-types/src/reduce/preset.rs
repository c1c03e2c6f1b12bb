use crate::{Preset, PresetId, SessionState, Set, SetId};

use super::{upsert_by_position, Reduced};

pub(super) fn reduce(state: &mut SessionState, preset: &Preset) -> Reduced {
    let set_index = preset.set_id.get();
    let sets = &mut state.pod.sets;

    // Fill the gap up to the referenced set so the index resolves.
    let placeholders = (set_index + 1).saturating_sub(sets.len());
    while sets.len() <= set_index {
        let id = SetId::new(sets.len());
        sets.push(Set::placeholder(id));
    }

    let outcome = upsert_by_position(
        &mut sets[set_index].presets,
        preset.id.get(),
        preset.clone(),
        |p| p.id.get(),
    );
    state.pod.current_set_id = Some(SetId::new(set_index));
    state.pod.current_preset_id = Some(PresetId::new(outcome.slot()));

    Reduced::Preset {
        placeholders,
        outcome,
    }
}
