//! Origin resolution — walks a chain of providers.
//!
//! Typical chain: manual coordinates → IP geolocation → last known position.
//! A failure anywhere is "no origin", never a crash.

use super::providers::LocationProvider;
use super::types::{LocationError, Origin};
use tracing::{info, warn};

/// Tries each provider in order; the first success wins.
#[derive(Default)]
pub struct ChainProvider {
    providers: Vec<Box<dyn LocationProvider + Send + Sync>>,
}

impl ChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl LocationProvider + Send + Sync + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl LocationProvider for ChainProvider {
    fn current_position(&self) -> Result<Origin, LocationError> {
        let mut last_err = LocationError::Unavailable("no location provider configured".into());
        for provider in &self.providers {
            match provider.current_position() {
                Ok(origin) => return Ok(origin),
                Err(e) => {
                    warn!(error = %e, "location provider failed, trying next");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

/// Ask `provider` for a position, mapping every failure to `None`.
pub fn locate(provider: &dyn LocationProvider) -> Option<Origin> {
    match provider.current_position() {
        Ok(origin) => {
            info!(point = %origin.point, source = %origin.source, "origin acquired");
            Some(origin)
        }
        Err(e) => {
            warn!(error = %e, "no origin available");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::location::providers::ManualProvider;
    use crate::location::types::OriginSource;

    struct Denied;

    impl LocationProvider for Denied {
        fn current_position(&self) -> Result<Origin, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[test]
    fn test_denied_is_none() {
        assert!(locate(&Denied).is_none());
    }

    #[test]
    fn test_chain_falls_through() {
        let chain = ChainProvider::new()
            .with(Denied)
            .with(ManualProvider::new(-12.0464, -77.0428));
        let origin = locate(&chain).unwrap();
        assert_eq!(origin.source, OriginSource::Manual);
        assert_eq!(origin.point, GeoPoint { latitude: -12.0464, longitude: -77.0428 });
    }

    #[test]
    fn test_chain_returns_last_error() {
        let chain = ChainProvider::new()
            .with(ManualProvider::new(100.0, 0.0))
            .with(Denied);
        assert!(matches!(chain.current_position(), Err(LocationError::PermissionDenied)));
    }

    #[test]
    fn test_empty_chain() {
        let chain = ChainProvider::new();
        assert!(chain.is_empty());
        assert!(matches!(chain.current_position(), Err(LocationError::Unavailable(_))));
    }
}
