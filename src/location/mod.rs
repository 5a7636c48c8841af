//! Origin acquisition for nearest-center lookups.
//!
//! Provides manual coordinates, IP-based geolocation, the last known
//! position from the local cache, and a chain that tries them in order.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{CachedProvider, IpProvider, LocationProvider, ManualProvider};
pub use resolver::{locate, ChainProvider};
pub use types::{LocationError, Origin, OriginSource};
