//! Domain types for the departure board.
//!
//! Favourites, departures and catalog records, plus the pure helpers that
//! compare place names and order line labels.

mod departure;
mod favourite;
mod line;
mod natural;
mod place;

pub use departure::{Countdown, Departure, eta_seconds};
pub use favourite::{
    DEFAULT_LINE_COLOR, DEFAULT_LINE_TEXT_COLOR, Favourite, FavouriteKey, GroupKey,
};
pub use line::{DirectionOption, LineAtStop, Resolution, StopOnLine};
pub use natural::NaturalKey;
pub use place::{filter_stops, is_same_place, normalize};
