//! Core types for origin acquisition.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How the user's position was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginSource {
    Manual,
    IpApi,
    Cache,
}

impl fmt::Display for OriginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "Manual"),
            Self::IpApi => write!(f, "IP"),
            Self::Cache => write!(f, "Last known"),
        }
    }
}

/// A validated position plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub point: GeoPoint,
    pub source: OriginSource,
    /// Place label from the provider, e.g. "Lima, Peru".
    #[serde(default)]
    pub label: Option<String>,
}

/// Why no position is available.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("Invalid coordinates ({lat}, {lon}). Lat: -90..90, Lon: -180..180")]
    InvalidCoordinates { lat: f64, lon: f64 },
}
