//! The operations exposed as units of work.
//!
//! Each function takes shared handles to its collaborators, spawns the unit
//! and returns its [`WorkHandle`] straight away.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{Reporter, UnitError, WorkHandle, spawn_unit};
use crate::catalog::{self, StaticCatalog};
use crate::domain::{DirectionOption, Favourite, LineAtStop, Resolution, StopOnLine};
use crate::pipeline::{
    AggregatorConfig, DepartureMap, aggregate, exclude_terminus, probe_directions, resolve_stop,
};
use crate::siri::LiveFeed;

/// Result of the resolve-and-probe unit.
///
/// An empty `stop_area_id` means the stop could not be resolved; the
/// directions are then empty too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub stop_area_id: String,
    pub stop_name: String,
    pub directions: Vec<DirectionOption>,
}

impl ProbeOutcome {
    fn resolved_only(resolution: Resolution) -> Self {
        Self {
            stop_area_id: resolution.stop_area_id,
            stop_name: resolution.stop_name,
            directions: Vec::new(),
        }
    }
}

/// Aggregate departures for `favourites`.
///
/// Each failed group is reported as one error; the map holds every
/// favourite whose group succeeded.
pub fn departures<F>(
    feed: Arc<F>,
    favourites: Vec<Favourite>,
    config: AggregatorConfig,
) -> WorkHandle<DepartureMap>
where
    F: LiveFeed + 'static,
{
    spawn_unit(move |reporter: Reporter<DepartureMap>| async move {
        let aggregation = aggregate(&*feed, &favourites, &config).await;
        for failure in aggregation.failures {
            reporter.error(UnitError::from_departure_request(failure.error));
        }
        aggregation.departures
    })
}

/// Search lines by label and transport mode.
pub fn line_search<C>(catalog: Arc<C>, query: String, mode: String) -> WorkHandle<Vec<LineAtStop>>
where
    C: StaticCatalog + 'static,
{
    spawn_unit(move |reporter: Reporter<Vec<LineAtStop>>| async move {
        match catalog::search_lines(&*catalog, &query, &mode).await {
            Ok(lines) => lines,
            Err(e) => {
                reporter.error(UnitError::LineSearch(e));
                Vec::new()
            }
        }
    })
}

/// List the stops of a route.
pub fn stops_on_line<C>(catalog: Arc<C>, route_id: String) -> WorkHandle<Vec<StopOnLine>>
where
    C: StaticCatalog + 'static,
{
    spawn_unit(move |reporter: Reporter<Vec<StopOnLine>>| async move {
        match catalog::stops_on_line(&*catalog, &route_id).await {
            Ok(stops) => stops,
            Err(e) => {
                reporter.error(UnitError::StopsOnLine(e));
                Vec::new()
            }
        }
    })
}

/// Resolve a catalog stop and probe the directions served there.
///
/// `stop_name` is the name the caller already knows for the stop, possibly
/// empty. Directions terminating at the stop (by that name, or the resolved
/// one) are removed.
///
/// A resolution failure is reported and finishes with an empty outcome. An
/// unmatched stop finishes empty without an error. A probe failure after a
/// successful resolution is reported and still delivers the resolved stop.
pub fn resolve_and_probe<C, F>(
    catalog: Arc<C>,
    feed: Arc<F>,
    stop_id: String,
    line_id: String,
    stop_name: String,
) -> WorkHandle<ProbeOutcome>
where
    C: StaticCatalog + 'static,
    F: LiveFeed + 'static,
{
    spawn_unit(move |reporter: Reporter<ProbeOutcome>| async move {
        let resolution = match resolve_stop(&*catalog, &stop_id).await {
            Ok(resolution) => resolution,
            Err(e) => {
                reporter.error(UnitError::Resolution(e));
                return ProbeOutcome::default();
            }
        };
        if !resolution.is_resolved() {
            debug!(stop_id = %stop_id, "stop did not resolve, skipping probe");
            return ProbeOutcome::default();
        }

        let directions =
            match probe_directions(&*feed, &resolution.stop_area_id, &line_id).await {
                Ok(directions) => directions,
                Err(e) => {
                    reporter.error(UnitError::Directions(e));
                    return ProbeOutcome::resolved_only(resolution);
                }
            };

        let terminus = if stop_name.is_empty() {
            resolution.stop_name.as_str()
        } else {
            stop_name.as_str()
        };
        let directions = exclude_terminus(directions, terminus);

        ProbeOutcome {
            directions,
            ..ProbeOutcome::resolved_only(resolution)
        }
    })
}
