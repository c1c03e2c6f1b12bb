//! Client-side state synchronization for a remote pedal board.
//!
//! The backend process owns the device; this crate keeps a local model of
//! it consistent with the backend's push events and the operator's edits:
//!
//! - [`sync::PodSync`] owns the canonical state and publishes immutable
//!   snapshots to subscribers.
//! - [`event_port::EventBus`] is the named-event surface the transport
//!   delivers into.
//! - [`controller::PodController`] is the parameter mutation service:
//!   validation, optimistic update, backend dispatch, echo tracking and
//!   tap tempo.

pub mod backend;
pub mod config;
pub mod controller;
pub mod event_port;
pub mod fanout;
pub mod mutation;
pub mod selection;
pub mod snapshot;
pub mod sync;

pub use backend::RecordingBackend;
pub use config::Config;
pub use controller::{PodController, TapResult};
pub use event_port::{EventBus, PodBinding};
pub use fanout::{Subscribers, Subscription, SubscriptionId};
pub use mutation::{MutationOutcome, RejectReason, ServiceOptions, TapOutcome, TapTempo};
pub use selection::ViewCursor;
pub use snapshot::PodSnapshot;
pub use sync::PodSync;
