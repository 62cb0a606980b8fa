//! Stop resolution, direction probing and departure aggregation.
//!
//! Creating a favourite resolves the chosen catalog stop to a stop area and
//! probes the live feed for the directions in service there. Refreshing the
//! board aggregates departures for all favourites with as few live-feed
//! requests as possible.

mod aggregate;
mod probe;
mod resolve;


pub use aggregate::{
    Aggregation, AggregatorConfig, DepartureMap, GroupFailure, MAX_DEPARTURES, aggregate,
    coalesce, select_departures,
};
pub use probe::{DestinationSet, directions_from_payload, exclude_terminus, probe_directions};
pub use resolve::{RAIL_MARKER, StopIdScheme, resolve_stop};
