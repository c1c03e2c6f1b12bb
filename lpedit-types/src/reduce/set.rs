use crate::{Set, SessionState, SetId};

use super::{upsert_by_position, Reduced};

pub(super) fn reduce(state: &mut SessionState, set: &Set) -> Reduced {
    let outcome = upsert_by_position(&mut state.pod.sets, set.id.get(), set.clone(), |s| s.id.get());
    state.pod.current_set_id = Some(SetId::new(outcome.slot()));
    Reduced::Set(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::UpsertOutcome;
    use crate::{Preset, PresetId};

    fn set(id: usize, name: &str) -> Set {
        Set::new(SetId::new(id), name)
    }

    #[test]
    fn first_set_appends_and_selects() {
        let mut state = SessionState::new();
        assert_eq!(reduce(&mut state, &set(0, "A")), Reduced::Set(UpsertOutcome::Appended(0)));
        assert_eq!(state.pod.sets.len(), 1);
        assert_eq!(state.pod.current_set_id, Some(SetId::new(0)));
    }

    #[test]
    fn existing_slot_is_replaced() {
        let mut state = SessionState::new();
        reduce(&mut state, &set(0, "A"));
        reduce(&mut state, &set(1, "B"));
        reduce(&mut state, &set(0, "A2"));
        assert_eq!(state.pod.sets.len(), 2);
        assert_eq!(state.pod.sets[0].name, "A2");
        assert_eq!(state.pod.current_set_id, Some(SetId::new(0)));
    }

    #[test]
    fn replacing_set_swaps_its_presets() {
        let mut state = SessionState::new();
        let mut full = set(0, "A");
        full.presets.push(Preset::new(PresetId::new(0), SetId::new(0), "P1"));
        reduce(&mut state, &full);
        reduce(&mut state, &set(0, "A"));
        assert!(state.pod.sets[0].presets.is_empty());
    }

    #[test]
    fn out_of_order_set_appends_and_selects_landing_slot() {
        let mut state = SessionState::new();
        let outcome = reduce(&mut state, &set(5, "F"));
        assert_eq!(
            outcome,
            Reduced::Set(UpsertOutcome::AppendedOutOfOrder {
                requested: 5,
                slot: 0
            })
        );
        assert_eq!(state.pod.sets.len(), 1);
        assert_eq!(state.pod.current_set_id, Some(SetId::new(0)));
        assert_eq!(state.pod.current_set().map(|s| s.name.as_str()), Some("F"));
    }

    #[test]
    fn applying_same_set_twice_is_idempotent() {
        let mut once = SessionState::new();
        reduce(&mut once, &set(0, "A"));
        let mut twice = once.clone();
        reduce(&mut twice, &set(0, "A"));
        assert_eq!(once, twice);
    }
}
