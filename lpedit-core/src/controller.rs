//! Controller tying the synchronizer to a backend.
//!
//! Inbound events go through [`PodController::handle_event`]; operator intent
//! goes through the `request_*` methods, which validate, dispatch to the
//! backend and update local state optimistically. Optimistic edits are
//! tracked until the backend echoes them and reverted by [`PodController::tick`]
//! if the echo never comes.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use lpedit_types::reduce::Reduced;
use lpedit_types::{well_known, Backend, BackendCommand, ParameterId, PodEvent, PresetId, SetId};

use crate::fanout::{Subscription, SubscriptionId};
use crate::mutation::{
    validate, MutationOutcome, PendingChanges, RejectReason, ServiceOptions, TapOutcome, TapTempo,
};
use crate::snapshot::PodSnapshot;
use crate::sync::PodSync;

/// What a tap did: the estimate, and the submission outcome if one was made.
#[derive(Debug, Clone, PartialEq)]
pub struct TapResult {
    pub outcome: TapOutcome,
    pub submitted: Option<MutationOutcome>,
}

pub struct PodController<B: Backend> {
    sync: PodSync,
    backend: B,
    pending: PendingChanges,
    tap: TapTempo,
    options: ServiceOptions,
}

impl<B: Backend> PodController<B> {
    pub fn new(backend: B, options: ServiceOptions) -> Self {
        Self {
            sync: PodSync::new(),
            backend,
            pending: PendingChanges::new(options.pending_timeout),
            tap: TapTempo::new(),
            options,
        }
    }

    pub fn snapshot(&self) -> Arc<PodSnapshot> {
        self.sync.snapshot()
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.sync.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.sync.unsubscribe(id)
    }

    pub fn sync(&self) -> &PodSync {
        &self.sync
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Tear down the controller, handing back the transport.
    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    /// Merge an event from the backend.
    pub fn handle_event(&mut self, event: &PodEvent) -> Reduced {
        match event {
            PodEvent::ParameterChange(parameter) => {
                self.pending.confirm(parameter);
            }
            PodEvent::Start
            | PodEvent::Stop { .. }
            | PodEvent::PresetChange(_)
            | PodEvent::SetChange(_) => {
                if !self.pending.is_empty() {
                    info!(target: "mutation", "dropping {} pending edit(s) on {}", self.pending.len(), event.kind());
                    self.pending.clear();
                }
            }
            _ => {}
        }
        self.sync.apply(event)
    }

    /// Validate and apply a parameter change on the selected preset.
    pub fn request_parameter_value(&mut self, parameter_id: ParameterId, value: &str) -> MutationOutcome {
        self.request_parameter_value_at(parameter_id, value, Instant::now())
    }

    pub fn request_parameter_value_at(
        &mut self,
        parameter_id: ParameterId,
        value: &str,
        now: Instant,
    ) -> MutationOutcome {
        let outcome = self.try_request(parameter_id, value, now);
        if let MutationOutcome::Rejected(reason) = &outcome {
            warn!(target: "mutation", "parameter {} <- '{}' rejected: {}", parameter_id, value, reason);
        }
        outcome
    }

    fn try_request(&mut self, parameter_id: ParameterId, value: &str, now: Instant) -> MutationOutcome {
        let Some((set, preset)) = self.sync.selection() else {
            return MutationOutcome::Rejected(RejectReason::NoSelection);
        };
        let snapshot = self.sync.snapshot();
        let Some(current) = snapshot.current_preset.as_ref() else {
            return MutationOutcome::Rejected(RejectReason::NoSelection);
        };
        let Some(parameter) = current.parameter(parameter_id) else {
            return MutationOutcome::Rejected(RejectReason::UnknownParameter(parameter_id));
        };
        if let Err(reason) = validate(parameter, value, self.options.strict_enumerations) {
            return MutationOutcome::Rejected(reason);
        }

        let command = BackendCommand::SetParameterValue {
            parameter_id,
            value: value.to_string(),
        };
        if let Err(e) = self.backend.send(command) {
            return MutationOutcome::Rejected(RejectReason::Dispatch(e.to_string()));
        }

        if let Some(previous) = self.sync.set_parameter_value(parameter_id, value) {
            self.pending.record(set, preset, previous, value, now);
        }
        MutationOutcome::Accepted
    }

    /// Tempo typed by the operator.
    pub fn request_tempo(&mut self, text: &str) -> MutationOutcome {
        self.request_parameter_value(well_known::TEMPO, text.trim())
    }

    /// Register a tap at `now_ms` and submit the estimate when it is in range.
    pub fn tap_tempo(&mut self, now_ms: u64) -> TapResult {
        let snapshot = self.sync.snapshot();
        let tempo = snapshot
            .current_preset
            .as_ref()
            .and_then(|p| p.parameter(well_known::TEMPO));
        let outcome = self.tap.tap(now_ms, tempo);
        let submitted = match outcome {
            TapOutcome::Estimated(bpm) => {
                Some(self.request_parameter_value(well_known::TEMPO, &bpm.to_string()))
            }
            _ => None,
        };
        TapResult { outcome, submitted }
    }

    /// Ask the device to switch presets. Local state waits for the echo.
    pub fn set_preset(&mut self, preset_id: PresetId, set_id: SetId) -> io::Result<()> {
        self.backend.send(BackendCommand::SetPreset { preset_id, set_id })
    }

    pub fn save_preset(&mut self) -> io::Result<()> {
        self.backend.send(BackendCommand::SavePreset)
    }

    pub fn reload_preset(&mut self) -> io::Result<()> {
        self.backend.send(BackendCommand::ReloadPreset)
    }

    pub fn start_device(&mut self, device: &str) -> io::Result<()> {
        self.backend.send(BackendCommand::Start {
            device: device.to_string(),
        })
    }

    pub fn stop_device(&mut self) -> io::Result<()> {
        self.backend.send(BackendCommand::Stop)
    }

    pub fn list_devices(&mut self) -> io::Result<()> {
        self.backend.send(BackendCommand::ListDevices)
    }

    /// Revert edits whose echo is overdue. Returns how many were reverted.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut reverted = 0;
        for change in self.pending.expire(now) {
            warn!(
                target: "mutation",
                "no confirmation for parameter {} = '{}', reverting to '{}'",
                change.confirmed.id, change.requested, change.confirmed.value
            );
            if self.sync.restore_parameter(change.set, change.preset, change.confirmed) {
                reverted += 1;
            }
        }
        reverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lpedit_types::{Parameter, Preset};

    use crate::backend::RecordingBackend;

    fn controller() -> PodController<RecordingBackend> {
        let mut c = PodController::new(RecordingBackend::new(), ServiceOptions::default());
        let mut preset = Preset::new(PresetId::new(0), SetId::new(0), "P1");
        preset.parameters.push(Parameter::enumerated(
            ParameterId::new(0),
            "Input 1 Source",
            "Guitar",
            &["Guitar", "Mic"],
        ));
        for i in 1..3 {
            preset
                .parameters
                .push(Parameter::numeric(ParameterId::new(i), "p", 0.0, 0, 10));
        }
        preset
            .parameters
            .push(Parameter::numeric(well_known::TEMPO, "Tempo", 120.0, 40, 220));
        c.handle_event(&PodEvent::Start);
        c.handle_event(&PodEvent::PresetChange(preset));
        c
    }

    fn tempo_value(c: &PodController<RecordingBackend>) -> String {
        c.snapshot().current_preset.as_ref().unwrap().parameters[3].value.clone()
    }

    #[test]
    fn accepted_request_dispatches_and_updates() {
        let mut c = controller();
        assert_eq!(c.request_tempo(" 98 "), MutationOutcome::Accepted);
        assert_eq!(
            c.backend_mut().take(),
            vec![BackendCommand::SetParameterValue {
                parameter_id: well_known::TEMPO,
                value: "98".into()
            }]
        );
        assert_eq!(tempo_value(&c), "98");
        assert!(c.pending().is_pending(well_known::TEMPO));
    }

    #[test]
    fn out_of_range_is_rejected_without_side_effects() {
        let mut c = controller();
        let before = c.snapshot();
        let outcome = c.request_parameter_value(well_known::TEMPO, "500");
        assert!(matches!(
            outcome,
            MutationOutcome::Rejected(RejectReason::OutOfRange { .. })
        ));
        assert!(c.backend().sent.is_empty());
        assert!(Arc::ptr_eq(&before, &c.snapshot()));
    }

    #[test]
    fn enumerated_values_are_not_rechecked() {
        let mut c = controller();
        assert!(c
            .request_parameter_value(well_known::INPUT_1_SOURCE, "Aux")
            .is_accepted());
    }

    #[test]
    fn no_selection_is_rejected() {
        let mut c = PodController::new(RecordingBackend::new(), ServiceOptions::default());
        assert_eq!(
            c.request_parameter_value(ParameterId::new(0), "1"),
            MutationOutcome::Rejected(RejectReason::NoSelection)
        );
        assert!(c.backend().sent.is_empty());
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let mut c = controller();
        assert_eq!(
            c.request_parameter_value(ParameterId::new(42), "1"),
            MutationOutcome::Rejected(RejectReason::UnknownParameter(ParameterId::new(42)))
        );
    }

    #[test]
    fn dispatch_failure_leaves_state_alone() {
        let mut c = controller();
        c.backend_mut().failure = Some(io::ErrorKind::BrokenPipe);
        let outcome = c.request_tempo("100");
        assert!(matches!(outcome, MutationOutcome::Rejected(RejectReason::Dispatch(_))));
        assert_eq!(tempo_value(&c), "120");
        assert!(c.pending().is_empty());
    }

    #[test]
    fn echo_confirms_and_tick_keeps_value() {
        let mut c = controller();
        let now = Instant::now();
        c.request_parameter_value_at(well_known::TEMPO, "100", now);
        let mut echo = Parameter::numeric(well_known::TEMPO, "Tempo", 100.0, 40, 220);
        echo.value = "100".into();
        c.handle_event(&PodEvent::ParameterChange(echo));
        assert!(c.pending().is_empty());
        assert_eq!(c.tick(now + Duration::from_secs(60)), 0);
        assert_eq!(tempo_value(&c), "100");
    }

    #[test]
    fn missing_echo_reverts_after_timeout() {
        let mut c = controller();
        let now = Instant::now();
        c.request_parameter_value_at(well_known::TEMPO, "100", now);
        assert_eq!(c.tick(now + Duration::from_millis(10)), 0);
        assert_eq!(tempo_value(&c), "100");
        assert_eq!(c.tick(now + Duration::from_secs(3)), 1);
        assert_eq!(tempo_value(&c), "120");
    }

    #[test]
    fn preset_switch_drops_pending_edits() {
        let mut c = controller();
        let now = Instant::now();
        c.request_parameter_value_at(well_known::TEMPO, "100", now);
        c.handle_event(&PodEvent::PresetChange(Preset::new(PresetId::new(1), SetId::new(0), "P2")));
        assert!(c.pending().is_empty());
        assert_eq!(c.tick(now + Duration::from_secs(10)), 0);
    }

    #[test]
    fn set_preset_only_dispatches() {
        let mut c = controller();
        let before = c.snapshot();
        c.set_preset(PresetId::new(3), SetId::new(1)).unwrap();
        assert_eq!(
            c.backend().sent,
            vec![BackendCommand::SetPreset {
                preset_id: PresetId::new(3),
                set_id: SetId::new(1)
            }]
        );
        assert!(Arc::ptr_eq(&before, &c.snapshot()));
    }

    #[test]
    fn tap_tempo_submits_in_range_estimate() {
        let mut c = controller();
        assert_eq!(c.tap_tempo(0).outcome, TapOutcome::Anchored);
        let result = c.tap_tempo(500);
        assert_eq!(result.outcome, TapOutcome::Estimated(120.0));
        assert_eq!(result.submitted, Some(MutationOutcome::Accepted));
        assert_eq!(
            c.backend().sent.last(),
            Some(&BackendCommand::SetParameterValue {
                parameter_id: well_known::TEMPO,
                value: "120".into()
            })
        );
    }

    #[test]
    fn tap_tempo_discards_fast_taps() {
        let mut c = controller();
        c.tap_tempo(0);
        let result = c.tap_tempo(50);
        assert_eq!(result.outcome, TapOutcome::OutOfRange(1200.0));
        assert_eq!(result.submitted, None);
        assert!(c.backend().sent.is_empty());
    }

    #[test]
    fn passthrough_commands() {
        let mut c = PodController::new(RecordingBackend::new(), ServiceOptions::default());
        c.start_device("hw:1").unwrap();
        c.save_preset().unwrap();
        c.reload_preset().unwrap();
        c.list_devices().unwrap();
        c.stop_device().unwrap();
        let names: Vec<&str> = c.backend().sent.iter().map(|cmd| cmd.name()).collect();
        assert_eq!(names, vec!["start", "savePreset", "reloadPreset", "listDevices", "stop"]);
    }
}
