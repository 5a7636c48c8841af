//! Origin providers: manual coordinates, IP geolocation, last known position.

use super::types::{LocationError, Origin, OriginSource};
use crate::geo::GeoPoint;
use serde::Deserialize;
use std::time::Duration;

/// One-shot "get current position".
pub trait LocationProvider {
    fn current_position(&self) -> Result<Origin, LocationError>;
}

// ─── Manual ─────────────────────────────────────────────────────

/// Coordinates typed by the user.
pub struct ManualProvider {
    lat: f64,
    lon: f64,
}

impl ManualProvider {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl LocationProvider for ManualProvider {
    fn current_position(&self) -> Result<Origin, LocationError> {
        let point = GeoPoint::new(self.lat, self.lon).ok_or(LocationError::InvalidCoordinates {
            lat: self.lat,
            lon: self.lon,
        })?;
        Ok(Origin { point, source: OriginSource::Manual, label: None })
    }
}

// ─── IP-based geolocation ───────────────────────────────────────

pub const IPAPI_URL: &str = "https://ipapi.co/json/";

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Approximate position from the public IP address.
pub struct IpProvider {
    url: String,
    timeout: Duration,
}

impl IpProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_url(IPAPI_URL, timeout)
    }

    pub fn with_url(url: &str, timeout: Duration) -> Self {
        Self { url: url.to_string(), timeout }
    }
}

impl LocationProvider for IpProvider {
    fn current_position(&self) -> Result<Origin, LocationError> {
        let response = ureq::get(&self.url)
            .set("User-Agent", concat!("Comitia/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let r: IpApiResult = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        if r.error {
            return Err(LocationError::Unavailable(
                r.reason.unwrap_or_else(|| "IP lookup refused".into()),
            ));
        }

        let lat = r.latitude.ok_or_else(|| LocationError::InvalidResponse("no latitude".into()))?;
        let lon = r.longitude.ok_or_else(|| LocationError::InvalidResponse("no longitude".into()))?;
        let point = GeoPoint::new(lat, lon).ok_or(LocationError::InvalidCoordinates { lat, lon })?;

        let label = match (r.city, r.country_name) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (Some(city), None) => Some(city),
            (None, country) => country,
        };

        Ok(Origin { point, source: OriginSource::IpApi, label })
    }
}

// ─── Last known position ────────────────────────────────────────

/// Position remembered from a previous lookup.
pub struct CachedProvider {
    last: Option<GeoPoint>,
}

impl CachedProvider {
    pub fn new(last: Option<GeoPoint>) -> Self {
        Self { last }
    }
}

impl LocationProvider for CachedProvider {
    fn current_position(&self) -> Result<Origin, LocationError> {
        self.last
            .map(|point| Origin { point, source: OriginSource::Cache, label: None })
            .ok_or_else(|| LocationError::Unavailable("no previous position recorded".into()))
    }
}
