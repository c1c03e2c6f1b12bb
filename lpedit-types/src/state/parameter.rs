//! Editable preset parameter as reported by the backend.

use serde::{Deserialize, Serialize};

use crate::ParameterId;

/// One editable value (numeric or enumerated) within a preset.
///
/// Enumerated parameters carry their choices in `allowed_value` and keep the
/// selected choice in `value`. Numeric parameters leave `allowed_value` empty
/// and are bounded by `min..=max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    pub id: ParameterId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub value_number: f32,
    #[serde(deserialize_with = "null_as_empty")]
    pub allowed_value: Vec<String>,
    pub min: i32,
    pub max: i32,
}

impl Parameter {
    /// Numeric parameter with the given range, current value taken from `value_number`.
    pub fn numeric(id: ParameterId, name: &str, value_number: f32, min: i32, max: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: String::new(),
            value: value_number.to_string(),
            value_number,
            allowed_value: Vec::new(),
            min,
            max,
        }
    }

    /// Enumerated parameter; `value` must be one of `choices`.
    pub fn enumerated(id: ParameterId, name: &str, value: &str, choices: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: String::new(),
            value: value.to_string(),
            value_number: 0.0,
            allowed_value: choices.iter().map(|c| c.to_string()).collect(),
            min: 0,
            max: 0,
        }
    }

    pub fn is_enumerated(&self) -> bool {
        !self.allowed_value.is_empty()
    }

    pub fn in_range(&self, value: f64) -> bool {
        value >= f64::from(self.min) && value <= f64::from(self.max)
    }

    /// Whether `value` satisfies this parameter's invariant: membership for
    /// enumerated parameters, parse-and-range for numeric ones.
    pub fn accepts(&self, value: &str) -> bool {
        if self.is_enumerated() {
            return self.allowed_value.iter().any(|v| v == value);
        }
        value
            .trim()
            .parse::<f64>()
            .map(|v| v.is_finite() && self.in_range(v))
            .unwrap_or(false)
    }

    /// Store `value` as the current value. Numeric parameters also refresh
    /// `value_number` when the text parses.
    pub fn assign(&mut self, value: &str) {
        self.value = value.to_string();
        if !self.is_enumerated() {
            if let Ok(v) = value.trim().parse::<f32>() {
                self.value_number = v;
            }
        }
    }
}

/// The backend serializes empty Go slices as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
