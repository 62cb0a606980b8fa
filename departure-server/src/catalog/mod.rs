//! Static reference catalogs from the regional open-data portal.
//!
//! Three datasets are used: lines (search by label and mode), stop/line
//! memberships (stops of a route) and stops (catalog stop id to stop area).
//! Stop ids in these datasets follow a different scheme from the live
//! feed's stop-area ids for bus and tram stops.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod search;
mod types;

pub use client::{
    CatalogClient, CatalogConfig, StaticCatalog, line_search_filter, route_filter, stop_filter,
};
pub use error::CatalogError;
pub use search::{lines_from_records, search_lines, stops_from_records, stops_on_line};
pub use types::{LineRecord, StopLineRecord, StopRecord};
