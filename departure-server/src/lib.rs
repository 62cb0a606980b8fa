//! Real-time departure board server.
//!
//! Turns a small set of saved favourites (stop, line, direction) into
//! ranked departure lists from a rate-limited live feed, and helps create
//! favourites by searching the static open-data catalogs.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod jobs;
pub mod pipeline;
pub mod refresh;
pub mod siri;
pub mod store;
pub mod web;
