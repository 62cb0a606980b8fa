//! Web layer for the departure board.
//!
//! Each endpoint runs one unit of work and answers with its terminal result
//! and the errors it reported along the way.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
