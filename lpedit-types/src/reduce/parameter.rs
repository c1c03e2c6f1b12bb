use crate::{Parameter, ParameterId, SessionState};

use super::{upsert_by_position, Reduced};

/// Parameter events only ever target the selected preset.
pub(super) fn reduce(state: &mut SessionState, parameter: &Parameter) -> Reduced {
    match state.pod.current_preset_mut() {
        Some(preset) => Reduced::Parameter(upsert_by_position(
            &mut preset.parameters,
            parameter.id.get(),
            parameter.clone(),
            |p| p.id.get(),
        )),
        None => Reduced::NoSelection,
    }
}

/// Optimistically store `value` on the selected preset's parameter.
///
/// Returns the parameter as it was before the change, or `None` when nothing
/// is selected or the position holds no parameter. Local values never append;
/// only device echoes go through [`upsert_by_position`].
pub fn apply_local_value(
    state: &mut SessionState,
    parameter_id: ParameterId,
    value: &str,
) -> Option<Parameter> {
    let parameter = state.pod.current_preset_mut()?.parameter_mut(parameter_id)?;
    let previous = parameter.clone();
    parameter.assign(value);
    Some(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::UpsertOutcome;
    use crate::{Preset, PresetId, Set, SetId};

    fn selected_state() -> SessionState {
        let mut preset = Preset::new(PresetId::new(0), SetId::new(0), "P1");
        for i in 0..4 {
            preset
                .parameters
                .push(Parameter::numeric(ParameterId::new(i), "p", 0.0, 0, 300));
        }
        let mut set = Set::new(SetId::new(0), "A");
        set.presets.push(preset);
        let mut state = SessionState::new();
        state.pod.sets.push(set);
        state.pod.current_set_id = Some(SetId::new(0));
        state.pod.current_preset_id = Some(PresetId::new(0));
        state
    }

    #[test]
    fn replaces_parameter_on_selected_preset() {
        let mut state = selected_state();
        let mut tempo = Parameter::numeric(ParameterId::new(3), "Tempo", 90.0, 40, 220);
        tempo.value = "90".into();
        assert_eq!(reduce(&mut state, &tempo), Reduced::Parameter(UpsertOutcome::Replaced(3)));
        let current = state.pod.current_preset().unwrap();
        assert_eq!(current.parameters[3].value, "90");
        assert_eq!(current.parameters.len(), 4);
    }

    #[test]
    fn no_selection_is_a_noop() {
        let mut state = selected_state();
        state.pod.current_preset_id = None;
        let before = state.clone();
        let param = Parameter::numeric(ParameterId::new(0), "Gain", 1.0, 0, 10);
        assert_eq!(reduce(&mut state, &param), Reduced::NoSelection);
        assert_eq!(state, before);
    }

    #[test]
    fn dangling_selection_is_a_noop() {
        let mut state = selected_state();
        state.pod.current_preset_id = Some(PresetId::new(7));
        let before = state.clone();
        let param = Parameter::numeric(ParameterId::new(0), "Gain", 1.0, 0, 10);
        assert_eq!(reduce(&mut state, &param), Reduced::NoSelection);
        assert_eq!(state, before);
    }

    #[test]
    fn same_parameter_twice_is_idempotent() {
        let mut once = selected_state();
        let param = Parameter::numeric(ParameterId::new(1), "Gain", 7.0, 0, 10);
        reduce(&mut once, &param);
        let mut twice = once.clone();
        reduce(&mut twice, &param);
        assert_eq!(once, twice);
    }

    #[test]
    fn local_value_returns_previous() {
        let mut state = selected_state();
        let previous = apply_local_value(&mut state, ParameterId::new(3), "128").unwrap();
        assert_eq!(previous.value, "0");
        let now = state.pod.current_preset().unwrap().parameter(ParameterId::new(3)).unwrap();
        assert_eq!(now.value, "128");
        assert!((now.value_number - 128.0).abs() < f32::EPSILON);
    }

    #[test]
    fn local_value_without_target_is_none() {
        let mut state = selected_state();
        assert!(apply_local_value(&mut state, ParameterId::new(10), "1").is_none());
        state.pod.current_set_id = None;
        assert!(apply_local_value(&mut state, ParameterId::new(0), "1").is_none());
    }
}
