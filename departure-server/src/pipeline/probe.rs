//! Direction probing.
//!
//! Neither catalog records which direction references are in service at a
//! stop for a line, so one live-feed sample is taken and every destination
//! seen in it is paired with the direction reference that served it.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::domain::{DirectionOption, is_same_place, normalize};
use crate::siri::{FeedError, LiveFeed, UNKNOWN_DESTINATION, extract_visits, text_or, value_or_empty};

/// Destinations in first-seen order, each with the first direction
/// reference it was seen with.
#[derive(Debug, Default)]
pub struct DestinationSet {
    entries: Vec<DirectionOption>,
    seen: HashSet<String>,
}

impl DestinationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a destination unless it was already seen.
    ///
    /// Returns whether it was recorded.
    pub fn insert_first(&mut self, destination: &str, direction_ref: &str) -> bool {
        if !self.seen.insert(destination.to_string()) {
            return false;
        }
        self.entries.push(DirectionOption {
            destination: destination.to_string(),
            direction_ref: direction_ref.to_string(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<DirectionOption> {
        self.entries
    }
}

/// Collect (destination, direction) pairs from a stop-monitoring payload.
///
/// Visits whose destination decodes to the placeholder or to nothing are
/// not recorded. A malformed payload yields no pairs.
pub fn directions_from_payload(payload: &Value) -> Vec<DirectionOption> {
    let mut set = DestinationSet::new();

    for visit in extract_visits(payload).unwrap_or_default() {
        let journey = &visit.monitored_vehicle_journey;
        let destination = text_or(&journey.destination_name, UNKNOWN_DESTINATION);
        if destination.is_empty() || destination == UNKNOWN_DESTINATION {
            continue;
        }
        set.insert_first(&destination, &value_or_empty(&journey.direction_ref));
    }

    set.into_vec()
}

/// Sample the live feed for the directions served at a stop area by a line.
///
/// Transport failures are errors; an unreadable payload gives an empty list.
pub async fn probe_directions<F: LiveFeed>(
    feed: &F,
    stop_area_id: &str,
    line_id: &str,
) -> Result<Vec<DirectionOption>, FeedError> {
    let payload = match feed.stop_monitoring(stop_area_id, line_id).await {
        Ok(payload) => payload,
        Err(FeedError::Json { message, .. }) => {
            debug!(stop_area_id, line_id, error = %message, "probe payload is not JSON");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let directions = directions_from_payload(&payload);
    debug!(stop_area_id, line_id, count = directions.len(), "probed directions");
    Ok(directions)
}

/// Drop directions that terminate at the stop itself.
///
/// With an unknown (empty) stop name nothing is dropped.
pub fn exclude_terminus(directions: Vec<DirectionOption>, stop_name: &str) -> Vec<DirectionOption> {
    let stop = normalize(stop_name);
    directions
        .into_iter()
        .filter(|d| !is_same_place(&stop, &normalize(&d.destination)))
        .collect()
}
