//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Countdown, Departure, Favourite};
use crate::jobs::WorkOutcome;
use crate::pipeline::DepartureMap;

/// Terminal result of a unit of work plus the errors it reported.
#[derive(Debug, Serialize)]
pub struct UnitResponse<T> {
    pub result: T,
    /// Status text for each error, in the order reported
    pub errors: Vec<String>,
}

impl<T> From<WorkOutcome<T>> for UnitResponse<T> {
    fn from(outcome: WorkOutcome<T>) -> Self {
        Self {
            result: outcome.result,
            errors: outcome.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Query for line search.
#[derive(Debug, Deserialize)]
pub struct LineSearchRequest {
    /// Text matched against the line label; empty lists all lines
    #[serde(default)]
    pub q: String,

    /// Transport mode, e.g. "bus" or "rail"; empty means any
    #[serde(default)]
    pub mode: String,
}

/// Query for the stops of a line.
#[derive(Debug, Deserialize)]
pub struct StopsRequest {
    pub route_id: String,

    /// Keep only stops whose name contains this text
    #[serde(default)]
    pub filter: String,
}

/// Query for resolving a stop and probing its directions.
#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    pub stop_id: String,
    pub line_id: String,

    /// Name of the selected stop, used to drop directions ending there
    #[serde(default)]
    pub stop_name: String,
}

/// Identity of a saved favourite.
#[derive(Debug, Deserialize)]
pub struct FavouriteTarget {
    pub stop_area_id: String,
    pub line_id: String,
    #[serde(default)]
    pub destination_name: String,
}

impl FavouriteTarget {
    /// A favourite carrying only the identifying fields.
    pub fn to_favourite(&self) -> Favourite {
        Favourite::new(&self.stop_area_id, "", &self.line_id, "")
            .with_direction("", &self.destination_name)
    }
}

#[derive(Debug, Serialize)]
pub struct FavouriteAdded {
    pub added: bool,
}

#[derive(Debug, Serialize)]
pub struct FavouriteRemoved {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// A departure with its countdown at response time.
#[derive(Debug, Serialize)]
pub struct DepartureView {
    #[serde(flatten)]
    pub departure: Departure,
    pub countdown: Countdown,
}

/// One favourite on the board.
#[derive(Debug, Serialize)]
pub struct BoardEntry {
    /// `<stop_area_id>_<line_id>_<direction>`
    pub key: String,
    pub favourite: Favourite,
    /// `None` when this favourite's request failed
    pub departures: Option<Vec<DepartureView>>,
}

/// Lay out departures in favourite order.
pub fn board(favourites: Vec<Favourite>, departures: &DepartureMap, now: f64) -> Vec<BoardEntry> {
    favourites
        .into_iter()
        .map(|favourite| {
            let key = favourite.key();
            let deps = departures.get(&key).cloned().map(|deps| {
                deps.into_iter()
                    .map(|departure| DepartureView {
                        countdown: departure.countdown(now),
                        departure,
                    })
                    .collect()
            });
            BoardEntry {
                key: key.to_string(),
                favourite,
                departures: deps,
            }
        })
        .collect()
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::UnitError;
    use crate::siri::FeedError;

    fn departure(eta: f64) -> Departure {
        Departure {
            line_name: "A".into(),
            line_id: "STIF:Line::C01742:".into(),
            destination: "Boissy-Saint-Léger".into(),
            expected_iso: "2024-03-15T10:05:00Z".into(),
            departure_status: "onTime".into(),
            vehicle_at_stop: false,
            direction_ref: "2".into(),
            fetch_timestamp: 1_710_496_800.0,
            eta_seconds: eta,
        }
    }

    #[test]
    fn unit_response_carries_status_text() {
        let outcome = WorkOutcome {
            result: vec![1, 2],
            errors: vec![UnitError::Departures(FeedError::Unauthorized)],
        };
        let response = UnitResponse::from(outcome);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["result"], serde_json::json!([1, 2]));
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
        assert!(json["errors"][0].as_str().unwrap().starts_with("network error"));
    }

    #[test]
    fn board_keeps_favourite_order_and_marks_failures() {
        let ok = Favourite::new("43114", "Saint-Germain", "C01742", "A").with_direction("2", "");
        let failed = Favourite::new("50980", "Auber", "C01742", "A");

        let mut map = DepartureMap::new();
        map.insert(ok.key(), vec![departure(300.0)]);

        let entries = board(vec![failed, ok], &map, 1_710_496_800.0);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "50980_C01742_");
        assert!(entries[0].departures.is_none());
        assert_eq!(entries[1].key, "43114_C01742_2");
        let deps = entries[1].departures.as_ref().unwrap();
        assert_eq!(deps[0].countdown, Countdown::Minutes(5));
    }

    #[test]
    fn departure_view_is_flat() {
        let view = DepartureView {
            departure: departure(300.0),
            countdown: Countdown::Minutes(5),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["destination"], "Boissy-Saint-Léger");
        assert_eq!(json["countdown"]["state"], "minutes");
        assert_eq!(json["countdown"]["minutes"], 5);
    }

    #[test]
    fn target_matches_saved_favourite() {
        let target = FavouriteTarget {
            stop_area_id: "1".into(),
            line_id: "L".into(),
            destination_name: "Nanterre".into(),
        };
        let saved = Favourite::new("1", "Auber", "L", "A").with_direction("2", "Nanterre");
        assert!(target.to_favourite().same_target(&saved));
    }
}
