//! Conversion from stop-monitoring payloads to domain departures.
//!
//! A payload that does not have the expected nesting yields no visits.
//! Mistyped fields inside a visit read as their defaults; only an entry that
//! is not an object at all is skipped.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{Departure, eta_seconds};

use super::types::{MonitoredStopVisit, UNKNOWN_DESTINATION, text_or, value_or_empty};

/// Pull the monitored visits out of `Siri.ServiceDelivery.StopMonitoringDelivery[0]`.
///
/// Returns `None` when the delivery is missing or malformed. A delivery with
/// no `MonitoredStopVisit` key has no visits.
pub fn extract_visits(payload: &Value) -> Option<Vec<MonitoredStopVisit>> {
    let delivery = payload
        .get("Siri")?
        .get("ServiceDelivery")?
        .get("StopMonitoringDelivery")?
        .get(0)?;

    let raw = match delivery.get("MonitoredStopVisit") {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(visits)) => visits,
        Some(_) => return None,
    };

    let visits = raw
        .iter()
        .filter_map(|visit| match MonitoredStopVisit::deserialize(visit) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(error = %e, "skipping undecodable visit");
                None
            }
        })
        .collect();

    Some(visits)
}

/// Convert one visit into a departure seen at `fetch_timestamp`.
pub fn convert_visit(visit: &MonitoredStopVisit, fetch_timestamp: f64) -> Departure {
    let journey = &visit.monitored_vehicle_journey;
    let call = &journey.monitored_call;
    let expected_iso = call.best_time().unwrap_or_default().to_string();

    Departure {
        line_name: text_or(&journey.published_line_name, ""),
        line_id: value_or_empty(&journey.line_ref),
        destination: text_or(&journey.destination_name, UNKNOWN_DESTINATION),
        eta_seconds: eta_seconds(&expected_iso, fetch_timestamp),
        expected_iso,
        departure_status: call.departure_status.clone().unwrap_or_default(),
        vehicle_at_stop: call.vehicle_at_stop.unwrap_or(false),
        direction_ref: value_or_empty(&journey.direction_ref),
        fetch_timestamp,
    }
}

/// Parse every visit of a payload into departures.
///
/// Unexpected payload shapes yield an empty list.
pub fn parse_departures(payload: &Value, fetch_timestamp: f64) -> Vec<Departure> {
    extract_visits(payload)
        .unwrap_or_default()
        .iter()
        .map(|v| convert_visit(v, fetch_timestamp))
        .collect()
}
