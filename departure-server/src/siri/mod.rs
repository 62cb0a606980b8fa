//! SIRI Lite stop-monitoring client.
//!
//! The live feed is rate limited and keyed by a user-supplied API token.
//! Responses nest the useful data as
//! `Siri.ServiceDelivery.StopMonitoringDelivery[0].MonitoredStopVisit[]`,
//! each visit describing one vehicle's next call at the monitored stop.

mod client;
mod convert;
mod error;
mod feed;
mod mock;
mod types;

pub use client::{Credential, SiriClient, SiriConfig, line_ref, monitoring_ref};
pub use convert::{convert_visit, extract_visits, parse_departures};
pub use error::FeedError;
pub use feed::{FeedBackend, LiveFeed};
pub use mock::MockFeed;
pub use types::{
    MonitoredCall, MonitoredStopVisit, TextField, UNKNOWN_DESTINATION, Valued, VehicleJourney,
    text_or, value_or_empty,
};
