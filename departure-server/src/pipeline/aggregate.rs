//! Departure aggregation for a set of favourites.
//!
//! Favourites on the same stop area and line share one live-feed request,
//! whatever their direction or destination. Each group's payload is parsed
//! once and then filtered and ranked separately for every favourite in the
//! group.

use std::collections::HashMap;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Departure, Favourite, FavouriteKey, GroupKey, is_same_place, normalize};
use crate::siri::{FeedError, LiveFeed, parse_departures};

/// Departures kept per favourite.
pub const MAX_DEPARTURES: usize = 5;

/// Departure lists keyed by favourite.
pub type DepartureMap = HashMap<FavouriteKey, Vec<Departure>>;

/// Configuration for an aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Departures kept per favourite.
    pub max_departures: usize,

    /// Group requests in flight at once. 1 fetches groups one after another.
    pub max_concurrent_groups: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_departures: MAX_DEPARTURES,
            max_concurrent_groups: 1,
        }
    }
}

/// A group whose request failed.
#[derive(Debug)]
pub struct GroupFailure {
    pub group: GroupKey,
    pub error: FeedError,
}

/// Result of one aggregation pass.
///
/// Favourites in failed groups have no entry in `departures`.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub departures: DepartureMap,
    pub failures: Vec<GroupFailure>,
}

/// Partition favourites by (stop area, line), in first-seen group order.
pub fn coalesce(favourites: &[Favourite]) -> Vec<(GroupKey, Vec<Favourite>)> {
    let mut groups: Vec<(GroupKey, Vec<Favourite>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for fav in favourites {
        let key = fav.group();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(fav.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![fav.clone()]));
            }
        }
    }

    groups
}

/// Filter and rank one group's departures for a favourite.
///
/// A departure is kept when it is not in the past, its destination contains
/// the favourite's destination (case-insensitive), its direction matches
/// (an empty favourite direction accepts all), and it is not heading to the
/// favourite's own stop. Survivors are ordered by expected time and cut to
/// `limit`.
pub fn select_departures(fav: &Favourite, departures: &[Departure], limit: usize) -> Vec<Departure> {
    let stop = normalize(&fav.stop_name);
    let wanted = fav.destination_name.to_lowercase();

    let mut matched: Vec<Departure> = departures
        .iter()
        .filter(|d| d.eta_seconds >= 0.0)
        .filter(|d| d.destination.to_lowercase().contains(&wanted))
        .filter(|d| fav.direction.is_empty() || d.direction_ref == fav.direction)
        .filter(|d| !is_same_place(&stop, &normalize(&d.destination)))
        .cloned()
        .collect();

    // Fixed-width ISO-8601 with the feed's offset sorts chronologically as text.
    matched.sort_by(|a, b| a.expected_iso.cmp(&b.expected_iso));
    matched.truncate(limit);
    matched
}

fn now_epoch() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Fetch, parse and distribute departures for every favourite.
///
/// One request per distinct (stop area, line). A failed request is recorded
/// in [`Aggregation::failures`] and the remaining groups still run. A
/// payload of unexpected shape gives its favourites empty lists.
pub async fn aggregate<F: LiveFeed>(
    feed: &F,
    favourites: &[Favourite],
    config: &AggregatorConfig,
) -> Aggregation {
    let groups = coalesce(favourites);
    debug!(
        favourites = favourites.len(),
        groups = groups.len(),
        "aggregating departures"
    );

    let fetched: Vec<(GroupKey, Vec<Favourite>, Result<Value, FeedError>, f64)> =
        stream::iter(groups)
            .map(|(group, favs)| async move {
                let result = feed
                    .stop_monitoring(&group.stop_area_id, &group.line_id)
                    .await;
                (group, favs, result, now_epoch())
            })
            .buffered(config.max_concurrent_groups.max(1))
            .collect()
            .await;

    let mut aggregation = Aggregation::default();

    for (group, favs, result, fetched_at) in fetched {
        let payload = match result {
            Ok(payload) => payload,
            Err(error) => {
                warn!(
                    stop_area_id = %group.stop_area_id,
                    line_id = %group.line_id,
                    error = %error,
                    "departure request failed"
                );
                aggregation.failures.push(GroupFailure { group, error });
                continue;
            }
        };

        let departures = parse_departures(&payload, fetched_at);
        debug!(
            stop_area_id = %group.stop_area_id,
            line_id = %group.line_id,
            visits = departures.len(),
            "parsed departures"
        );

        for fav in &favs {
            let selected = select_departures(fav, &departures, config.max_departures);
            aggregation.departures.insert(fav.key(), selected);
        }
    }

    aggregation
}
