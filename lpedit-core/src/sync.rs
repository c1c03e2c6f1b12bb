//! The state synchronizer: sole writer of the canonical session state.
//!
//! Every change runs the pure reducer on the private working state and then
//! publishes one fresh `Arc<PodSnapshot>`. Readers only ever see published
//! snapshots, so no partially applied update is observable.

use std::sync::Arc;

use log::{debug, info, trace, warn};

use lpedit_types::reduce::{self, Reduced, UpsertOutcome};
use lpedit_types::{
    Parameter, ParameterId, PodEvent, Preset, PresetId, SessionState, Set, SetId,
};

use crate::fanout::{Subscribers, Subscription, SubscriptionId};
use crate::snapshot::PodSnapshot;

pub struct PodSync {
    state: SessionState,
    snapshot: Arc<PodSnapshot>,
    subscribers: Subscribers,
}

impl Default for PodSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PodSync {
    pub fn new() -> Self {
        let state = SessionState::new();
        let snapshot = Arc::new(PodSnapshot::from_state(&state, 0));
        Self {
            state,
            snapshot,
            subscribers: Subscribers::new(),
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<PodSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Merge an inbound event. Publishes a snapshot if the state changed.
    pub fn apply(&mut self, event: &PodEvent) -> Reduced {
        let reduced = reduce::reduce_event(event, &mut self.state);
        log_reduced(event, &reduced);
        if reduced.changed() {
            self.publish();
        }
        reduced
    }

    pub fn on_session_start(&mut self) -> Reduced {
        self.apply(&PodEvent::Start)
    }

    pub fn on_session_stop(&mut self, error: Option<String>) -> Reduced {
        self.apply(&PodEvent::Stop { error })
    }

    pub fn on_set_changed(&mut self, set: Set) -> Reduced {
        self.apply(&PodEvent::SetChange(set))
    }

    pub fn on_preset_changed(&mut self, preset: Preset) -> Reduced {
        self.apply(&PodEvent::PresetChange(preset))
    }

    pub fn on_parameter_changed(&mut self, parameter: Parameter) -> Reduced {
        self.apply(&PodEvent::ParameterChange(parameter))
    }

    pub fn on_progress(&mut self, percent: i32) -> Reduced {
        self.apply(&PodEvent::StatusProgress(percent))
    }

    pub fn on_init_done(&mut self) -> Reduced {
        self.apply(&PodEvent::InitDone)
    }

    /// Optimistically store a locally requested value on the selected preset.
    ///
    /// Returns the parameter as it was before, or `None` (and publishes
    /// nothing) when there is no selected preset or no such parameter.
    ///
    /// Unlike [`PodSync::on_parameter_changed`], this never appends: a local
    /// request carries only a value, so a parameter the device has not
    /// described cannot be created from it.
    pub fn set_parameter_value(&mut self, parameter_id: ParameterId, value: &str) -> Option<Parameter> {
        let previous = reduce::apply_local_value(&mut self.state, parameter_id, value)?;
        debug!(target: "sync", "local value for parameter {} = '{}'", parameter_id, value);
        self.publish();
        Some(previous)
    }

    /// Put back `parameter` at its position, provided the given set/preset
    /// is still the selected one. Used to revert unconfirmed edits.
    pub fn restore_parameter(&mut self, set: SetId, preset: PresetId, parameter: Parameter) -> bool {
        if self.selection() != Some((set, preset)) {
            return false;
        }
        let Some(slot) = self
            .state
            .pod
            .current_preset_mut()
            .and_then(|p| p.parameter_mut(parameter.id))
        else {
            return false;
        };
        *slot = parameter;
        self.publish();
        true
    }

    /// Selected (set, preset) slot pair, if both are set.
    pub fn selection(&self) -> Option<(SetId, PresetId)> {
        Some((self.state.pod.current_set_id?, self.state.pod.current_preset_id?))
    }

    fn publish(&mut self) {
        let revision = self.snapshot.revision + 1;
        self.snapshot = Arc::new(PodSnapshot::from_state(&self.state, revision));
        trace!(target: "sync", "published {}", self.snapshot.summary());
        self.subscribers.publish(&self.snapshot);
    }
}

fn log_reduced(event: &PodEvent, reduced: &Reduced) {
    match (event, reduced) {
        (PodEvent::Start, _) => info!(target: "sync", "session started"),
        (PodEvent::Stop { error: Some(e) }, _) => warn!(target: "sync", "session stopped: {}", e),
        (PodEvent::Stop { error: None }, _) => info!(target: "sync", "session stopped"),
        (PodEvent::ParameterChange(p), Reduced::NoSelection) => {
            debug!(target: "sync", "parameter {} dropped: no preset selected", p.id)
        }
        (_, Reduced::Set(outcome)) => log_out_of_order("set", outcome),
        (_, Reduced::Preset { placeholders, outcome }) => {
            if *placeholders > 0 {
                warn!(target: "sync", "created {} placeholder set(s) for preset event", placeholders);
            }
            log_out_of_order("preset", outcome);
        }
        (_, Reduced::Parameter(outcome)) => log_out_of_order("parameter", outcome),
        (PodEvent::TypeChange(_), _) | (PodEvent::ActiveChange, _) => {
            trace!(target: "sync", "ignoring {}", event.kind())
        }
        _ => {}
    }
}

fn log_out_of_order(what: &str, outcome: &UpsertOutcome) {
    match outcome {
        UpsertOutcome::AppendedOutOfOrder { requested, slot } => warn!(
            target: "sync",
            "{} event for position {} is out of order, appended at {}",
            what, requested, slot
        ),
        UpsertOutcome::ReplacedOutOfOrder { requested, slot } => debug!(
            target: "sync",
            "{} event for position {} updates its out-of-order copy at {}",
            what, requested, slot
        ),
        _ => {}
    }
}
