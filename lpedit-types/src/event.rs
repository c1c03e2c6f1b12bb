//! Inbound events pushed by the backend.
//!
//! The backend emits events on a named channel: an event name plus an
//! optional JSON payload. [`PodEvent::decode`] turns such a record into a
//! typed event; [`PodEvent::encode`] is the inverse used by the backend side.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Parameter, Preset, Set};

/// Names of the events on the backend channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Start,
    Stop,
    StatusProgress,
    InitDone,
    ParameterChange,
    PresetChange,
    SetChange,
    TypeChange,
    ActiveChange,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::Start,
        EventKind::Stop,
        EventKind::StatusProgress,
        EventKind::InitDone,
        EventKind::ParameterChange,
        EventKind::PresetChange,
        EventKind::SetChange,
        EventKind::TypeChange,
        EventKind::ActiveChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Stop => "stop",
            EventKind::StatusProgress => "statusProgress",
            EventKind::InitDone => "initDone",
            EventKind::ParameterChange => "parameterChange",
            EventKind::PresetChange => "presetChange",
            EventKind::SetChange => "setChange",
            EventKind::TypeChange => "typeChange",
            EventKind::ActiveChange => "activeChange",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw record on the named-event channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NamedEvent {
    pub fn new(name: &str, data: Option<Value>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }
}

/// Typed event consumed by the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum PodEvent {
    /// A device session started.
    Start,
    /// The session ended; `error` is set for abnormal stops.
    Stop { error: Option<String> },
    /// Initialization progress in percent.
    StatusProgress(i32),
    /// Initialization finished.
    InitDone,
    ParameterChange(Parameter),
    PresetChange(Preset),
    SetChange(Set),
    /// Stage type changed; payload is opaque to the core.
    TypeChange(Value),
    /// The device's active state flipped.
    ActiveChange,
}

/// Why a named event could not be turned into a [`PodEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    UnknownEvent(String),
    MissingPayload(EventKind),
    InvalidPayload { kind: EventKind, message: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownEvent(name) => write!(f, "unknown event '{}'", name),
            DecodeError::MissingPayload(kind) => write!(f, "event '{}' requires a payload", kind),
            DecodeError::InvalidPayload { kind, message } => {
                write!(f, "invalid payload for '{}': {}", kind, message)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl PodEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PodEvent::Start => EventKind::Start,
            PodEvent::Stop { .. } => EventKind::Stop,
            PodEvent::StatusProgress(_) => EventKind::StatusProgress,
            PodEvent::InitDone => EventKind::InitDone,
            PodEvent::ParameterChange(_) => EventKind::ParameterChange,
            PodEvent::PresetChange(_) => EventKind::PresetChange,
            PodEvent::SetChange(_) => EventKind::SetChange,
            PodEvent::TypeChange(_) => EventKind::TypeChange,
            PodEvent::ActiveChange => EventKind::ActiveChange,
        }
    }

    pub fn decode(event: &NamedEvent) -> Result<PodEvent, DecodeError> {
        let kind = EventKind::from_name(&event.name)
            .ok_or_else(|| DecodeError::UnknownEvent(event.name.clone()))?;
        let data = event.data.as_ref().filter(|v| !v.is_null());

        let decoded = match kind {
            EventKind::Start => PodEvent::Start,
            EventKind::InitDone => PodEvent::InitDone,
            EventKind::ActiveChange => PodEvent::ActiveChange,
            EventKind::Stop => {
                // A stop is never dropped; odd payloads become the error text.
                let error = match data {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                PodEvent::Stop {
                    error: (!error.is_empty()).then_some(error),
                }
            }
            EventKind::StatusProgress => PodEvent::StatusProgress(parse(kind, required(kind, data)?)?),
            EventKind::ParameterChange => {
                PodEvent::ParameterChange(parse(kind, required(kind, data)?)?)
            }
            EventKind::PresetChange => PodEvent::PresetChange(parse(kind, required(kind, data)?)?),
            EventKind::SetChange => PodEvent::SetChange(parse(kind, required(kind, data)?)?),
            EventKind::TypeChange => PodEvent::TypeChange(data.cloned().unwrap_or(Value::Null)),
        };
        Ok(decoded)
    }

    pub fn encode(&self) -> NamedEvent {
        let data = match self {
            PodEvent::Start | PodEvent::InitDone | PodEvent::ActiveChange => None,
            PodEvent::Stop { error } => error.as_ref().map(|e| Value::String(e.clone())),
            PodEvent::StatusProgress(p) => Some(Value::from(*p)),
            PodEvent::ParameterChange(p) => serde_json::to_value(p).ok(),
            PodEvent::PresetChange(p) => serde_json::to_value(p).ok(),
            PodEvent::SetChange(s) => serde_json::to_value(s).ok(),
            PodEvent::TypeChange(v) => (!v.is_null()).then(|| v.clone()),
        };
        NamedEvent::new(self.kind().as_str(), data)
    }
}

fn required(kind: EventKind, data: Option<&Value>) -> Result<&Value, DecodeError> {
    data.ok_or(DecodeError::MissingPayload(kind))
}

fn parse<T: serde::de::DeserializeOwned>(kind: EventKind, value: &Value) -> Result<T, DecodeError> {
    T::deserialize(value).map_err(|e| DecodeError::InvalidPayload {
        kind,
        message: e.to_string(),
    })
}
