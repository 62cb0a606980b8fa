//! Errors reported by units of work.

use crate::catalog::CatalogError;
use crate::siri::FeedError;

/// A failure inside a unit of work.
///
/// Never ends the unit: it is reported as an event and the unit still
/// delivers a (possibly empty) result. The `Display` text is what users
/// see as status.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// A departure request failed in transport
    #[error("network error: {0}")]
    Departures(FeedError),

    /// A departure response could not be read
    #[error("data error: {0}")]
    DepartureData(FeedError),

    /// Line search failed
    #[error("search error: {0}")]
    LineSearch(CatalogError),

    /// Stops-on-line lookup failed
    #[error("stops error: {0}")]
    StopsOnLine(CatalogError),

    /// Stop resolution failed
    #[error("resolution error: {0}")]
    Resolution(CatalogError),

    /// Direction probing failed after the stop was resolved
    #[error("directions error: {0}")]
    Directions(FeedError),

    /// The unit's task panicked
    #[error("unit of work aborted: {0}")]
    Aborted(String),
}

impl UnitError {
    /// Classify a failed departure request.
    pub fn from_departure_request(error: FeedError) -> Self {
        if error.is_transport() {
            UnitError::Departures(error)
        } else {
            UnitError::DepartureData(error)
        }
    }
}
