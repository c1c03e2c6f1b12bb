//! Pure state-mutation reducers for the pedal board session.
//!
//! These functions are the single source of truth for event → state merges.
//! lpedit-core's synchronizer calls them on a private copy of the state and
//! publishes the result as a new snapshot.
//!
//! Reducers are pure: they mutate `SessionState` only. They do NOT:
//! - Log (the outcome is returned so the caller can)
//! - Publish snapshots or notify observers
//! - Talk to the backend

mod parameter;
mod preset;
mod session;
mod set;

pub use parameter::apply_local_value;

use crate::{PodEvent, SessionState};

/// Where an upserted entity landed in its owning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The slot existed and was overwritten.
    Replaced(usize),
    /// The entity was appended at exactly its requested position.
    Appended(usize),
    /// The requested position was beyond the end; the entity went to `slot`.
    AppendedOutOfOrder { requested: usize, slot: usize },
    /// An earlier out-of-order copy of the entity sat at `slot` and was
    /// overwritten in place.
    ReplacedOutOfOrder { requested: usize, slot: usize },
}

impl UpsertOutcome {
    /// Slot index the entity now occupies.
    pub fn slot(&self) -> usize {
        match *self {
            UpsertOutcome::Replaced(i) | UpsertOutcome::Appended(i) => i,
            UpsertOutcome::AppendedOutOfOrder { slot, .. }
            | UpsertOutcome::ReplacedOutOfOrder { slot, .. } => slot,
        }
    }

    pub fn is_out_of_order(&self) -> bool {
        matches!(
            self,
            UpsertOutcome::AppendedOutOfOrder { .. } | UpsertOutcome::ReplacedOutOfOrder { .. }
        )
    }
}

/// Insert `item` at position `requested`, replacing what is there.
///
/// Positions past the end never index out of bounds. An entry whose own id
/// (per `id_of`) equals `requested` is one that landed out of order earlier;
/// it is overwritten in place. Otherwise the item is appended and the outcome
/// says so. The sequence grows by at most one element, and never twice for
/// the same id.
pub fn upsert_by_position<T, F>(items: &mut Vec<T>, requested: usize, item: T, id_of: F) -> UpsertOutcome
where
    F: Fn(&T) -> usize,
{
    let len = items.len();
    if requested < len {
        items[requested] = item;
        return UpsertOutcome::Replaced(requested);
    }
    if let Some(slot) = items.iter().position(|existing| id_of(existing) == requested) {
        items[slot] = item;
        return UpsertOutcome::ReplacedOutOfOrder { requested, slot };
    }
    items.push(item);
    if requested == len {
        UpsertOutcome::Appended(len)
    } else {
        UpsertOutcome::AppendedOutOfOrder {
            requested,
            slot: len,
        }
    }
}

/// What applying an event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduced {
    /// Event carries nothing the state tracks.
    Unchanged,
    /// A parameter arrived while no preset was selected; dropped.
    NoSelection,
    /// Session flags were reset (start/stop).
    Session,
    /// Progress was recorded or cleared.
    Progress,
    Set(UpsertOutcome),
    Preset {
        /// Empty sets created to make the preset's set index resolvable.
        placeholders: usize,
        outcome: UpsertOutcome,
    },
    Parameter(UpsertOutcome),
}

impl Reduced {
    /// Whether the state may differ from before the event.
    pub fn changed(&self) -> bool {
        !matches!(self, Reduced::Unchanged | Reduced::NoSelection)
    }
}

/// Apply an event's state mutations to the given state.
pub fn reduce_event(event: &PodEvent, state: &mut SessionState) -> Reduced {
    match event {
        PodEvent::Start => session::start(state),
        PodEvent::Stop { error } => session::stop(state, error.as_deref()),
        PodEvent::StatusProgress(percent) => session::progress(state, *percent),
        PodEvent::InitDone => session::init_done(state),
        PodEvent::SetChange(s) => set::reduce(state, s),
        PodEvent::PresetChange(p) => preset::reduce(state, p),
        PodEvent::ParameterChange(p) => parameter::reduce(state, p),
        // Opaque to the core; stage types are carried by preset events.
        PodEvent::TypeChange(_) | PodEvent::ActiveChange => Reduced::Unchanged,
    }
}
