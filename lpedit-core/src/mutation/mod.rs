//! Parameter mutation: validation rules, outcomes, echo tracking and tap tempo.

mod pending;
mod tap_tempo;

pub use pending::{PendingChange, PendingChanges};
pub use tap_tempo::{TapOutcome, TapTempo};

use std::fmt;
use std::time::Duration;

use lpedit_types::{Parameter, ParameterId};

/// Result of a local mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Dispatched to the backend and applied optimistically.
    Accepted,
    /// Nothing was dispatched and local state is unchanged.
    Rejected(RejectReason),
}

impl MutationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MutationOutcome::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// No preset is selected on the device.
    NoSelection,
    /// The selected preset has no parameter at this position.
    UnknownParameter(ParameterId),
    /// Numeric parameter given text that does not parse.
    NotANumber(String),
    OutOfRange { value: f64, min: i32, max: i32 },
    /// Enumerated value outside the allowed list (strict mode only).
    NotAllowed(String),
    /// The backend could not be reached.
    Dispatch(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoSelection => write!(f, "no preset selected"),
            RejectReason::UnknownParameter(id) => write!(f, "no parameter at position {}", id),
            RejectReason::NotANumber(text) => write!(f, "'{}' is not a number", text),
            RejectReason::OutOfRange { value, min, max } => {
                write!(f, "{} is outside {}..={}", value, min, max)
            }
            RejectReason::NotAllowed(value) => write!(f, "'{}' is not an allowed value", value),
            RejectReason::Dispatch(err) => write!(f, "backend unavailable: {}", err),
        }
    }
}

impl std::error::Error for RejectReason {}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Accepted => write!(f, "accepted"),
            MutationOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

/// Knobs for the mutation service, usually taken from [`crate::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// How long an optimistic edit waits for its echo before reverting.
    pub pending_timeout: Duration,
    /// Check enumerated values against `allowed_value`.
    pub strict_enumerations: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            pending_timeout: Duration::from_millis(3000),
            strict_enumerations: false,
        }
    }
}

/// Check `value` against the parameter's constraints.
///
/// Numeric parameters must parse and fall within `min..=max`. Enumerated
/// parameters take any string unless `strict` is set.
pub fn validate(parameter: &Parameter, value: &str, strict: bool) -> Result<(), RejectReason> {
    if parameter.is_enumerated() {
        if strict && !parameter.accepts(value) {
            return Err(RejectReason::NotAllowed(value.to_string()));
        }
        return Ok(());
    }

    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| RejectReason::NotANumber(value.to_string()))?;
    if !number.is_finite() {
        return Err(RejectReason::NotANumber(value.to_string()));
    }
    if !parameter.in_range(number) {
        return Err(RejectReason::OutOfRange {
            value: number,
            min: parameter.min,
            max: parameter.max,
        });
    }
    Ok(())
}
