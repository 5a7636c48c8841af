//! Comitia — nearest voting center lookup for Peru's 2026 general elections.
//!
//! The core is [`nearest::resolve`], a pure Haversine search over a list of
//! voting centers. Around it sit the backend listing client and cache
//! ([`centers`]), origin providers ([`location`]), the electoral calendar
//! ([`calendar`]), and a small HTTP service ([`server`]).

pub mod calendar;
pub mod centers;
pub mod config;
pub mod geo;
pub mod location;
pub mod nearest;
pub mod server;
