//! Named-event subscription surface.
//!
//! The transport delivers backend events into an [`EventBus`], one handler per
//! event kind. [`PodBinding`] wires every kind to a [`PodController`] and
//! removes all of its handlers together when detached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{trace, warn};

use lpedit_types::{Backend, EventKind, NamedEvent, PodEvent};

use crate::controller::PodController;

type Handler = Box<dyn FnMut(&PodEvent)>;

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Handler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, replacing any previous one.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&PodEvent) + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn off(&mut self, kind: EventKind) -> bool {
        self.handlers.remove(&kind).is_some()
    }

    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the handler for the event's kind. Returns false if none is registered.
    pub fn emit(&mut self, event: &PodEvent) -> bool {
        match self.handlers.get_mut(&event.kind()) {
            Some(handler) => {
                handler(event);
                true
            }
            None => {
                trace!(target: "events", "no handler for {}", event.kind());
                false
            }
        }
    }

    /// Decode a raw named event and emit it. Undecodable events are dropped.
    pub fn emit_named(&mut self, event: &NamedEvent) -> bool {
        match PodEvent::decode(event) {
            Ok(decoded) => self.emit(&decoded),
            Err(e) => {
                warn!(target: "events", "dropping event: {}", e);
                false
            }
        }
    }
}

/// The set of handlers one controller registered on a bus.
#[must_use = "a binding must be detached on teardown"]
pub struct PodBinding {
    kinds: Vec<EventKind>,
}

impl PodBinding {
    /// Route every event kind on `bus` into `controller`.
    pub fn attach<B>(bus: &mut EventBus, controller: Rc<RefCell<PodController<B>>>) -> Self
    where
        B: Backend + 'static,
    {
        for kind in EventKind::ALL {
            let controller = Rc::clone(&controller);
            bus.on(kind, move |event| {
                controller.borrow_mut().handle_event(event);
            });
        }
        Self {
            kinds: EventKind::ALL.to_vec(),
        }
    }

    /// Deregister all handlers added by [`PodBinding::attach`].
    pub fn detach(self, bus: &mut EventBus) {
        for kind in &self.kinds {
            bus.off(*kind);
        }
    }
}
