//! SIRI Lite stop-monitoring response DTOs.
//!
//! Only the fields the board uses are modelled. Everything is optional or
//! defaulted because the feed omits fields freely, and a few fields change
//! shape between producers (list of `{ "value": .. }` vs plain string).
//! A field of the wrong type reads as its default instead of failing the
//! whole visit.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Placeholder used when a destination cannot be decoded.
pub const UNKNOWN_DESTINATION: &str = "?";

/// Decode a field, falling back to `T::default()` when its type is wrong.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A `{ "value": "..." }` wrapper as used by SIRI references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Valued {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

/// A text field that may arrive as a list of values, a bare string, or
/// something else entirely.
///
/// Decoding never fails: unexpected shapes land in `Other` and read as the
/// caller's default.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    List(Vec<Valued>),
    Scalar(String),
    Other(IgnoredAny),
}

impl TextField {
    /// Read the field, falling back to `default`.
    ///
    /// - list: the first element's value; `default` if the list is empty or
    ///   the first element has no value
    /// - string: the string itself; `default` if it is empty
    /// - anything else: `default`
    pub fn first_or(&self, default: &str) -> String {
        match self {
            TextField::List(items) => items
                .first()
                .and_then(|v| v.value.clone())
                .unwrap_or_else(|| default.to_string()),
            TextField::Scalar(s) if !s.is_empty() => s.clone(),
            TextField::Scalar(_) | TextField::Other(_) => default.to_string(),
        }
    }
}

/// Read an optional text field, falling back to `default` when absent.
pub fn text_or(field: &Option<TextField>, default: &str) -> String {
    field
        .as_ref()
        .map_or_else(|| default.to_string(), |f| f.first_or(default))
}

/// Read an optional `{ "value": .. }` reference, empty when absent.
pub fn value_or_empty(field: &Option<Valued>) -> String {
    field
        .as_ref()
        .and_then(|v| v.value.clone())
        .unwrap_or_default()
}

/// One entry of `MonitoredStopVisit`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredStopVisit {
    #[serde(default, deserialize_with = "lenient")]
    pub monitored_vehicle_journey: VehicleJourney,
}

/// The vehicle serving a visit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleJourney {
    #[serde(default, deserialize_with = "lenient")]
    pub line_ref: Option<Valued>,
    #[serde(default, deserialize_with = "lenient")]
    pub direction_ref: Option<Valued>,
    #[serde(default)]
    pub published_line_name: Option<TextField>,
    #[serde(default)]
    pub destination_name: Option<TextField>,
    #[serde(default, deserialize_with = "lenient")]
    pub monitored_call: MonitoredCall,
}

/// The vehicle's call at the monitored stop.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredCall {
    #[serde(default, deserialize_with = "lenient")]
    pub expected_departure_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expected_arrival_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub aimed_departure_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub departure_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vehicle_at_stop: Option<bool>,
}

impl MonitoredCall {
    /// Best available time: expected departure, else expected arrival,
    /// else aimed departure. Empty strings count as absent.
    pub fn best_time(&self) -> Option<&str> {
        [
            &self.expected_departure_time,
            &self.expected_arrival_time,
            &self.aimed_departure_time,
        ]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .find(|t| !t.is_empty())
    }
}
