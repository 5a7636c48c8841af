use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::calendar::{self, ElectionEvent, MemberEvent};
use crate::centers::{CenterError, CenterFilter, CenterListing, CenterSource, VotingCenter};
use crate::geo::GeoPoint;
use crate::nearest::{self, NearestResult};

use super::state::AppState;

const MAX_TOP: usize = 20;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<CenterError> for ApiError {
    fn from(e: CenterError) -> Self {
        let status = match e {
            CenterError::NotFound(_) => StatusCode::NOT_FOUND,
            CenterError::CacheMiss => StatusCode::SERVICE_UNAVAILABLE,
            CenterError::Network(_) | CenterError::Status(_) | CenterError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        api_error(status, e.to_string())
    }
}

// ─── Listing helper ──────────────────────────────────────────────

/// Run the blocking directory lookup off the async runtime.
async fn list_centers(state: Arc<AppState>, filter: CenterFilter) -> Result<CenterListing, ApiError> {
    tokio::task::spawn_blocking(move || state.directory.list(&filter).map_err(ApiError::from))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> &'static str {
    "ok"
}

// ─── GET /api/nearest ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distrito: Option<String>,
    pub dni: Option<String>,
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub origin: GeoPoint,
    pub nearest: Option<NearestResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranked: Vec<NearestResult>,
    pub centers_considered: usize,
    pub source: CenterSource,
}

pub async fn nearest_center(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, ApiError> {
    let start = Instant::now();

    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")),
    };
    let origin = GeoPoint::new(lat, lon).ok_or_else(|| {
        api_error(StatusCode::BAD_REQUEST, "Invalid coordinates. Lat: -90..90, Lon: -180..180")
    })?;

    let filter = CenterFilter {
        distrito: params.distrito.clone(),
        dni: params.dni.clone(),
        ..Default::default()
    };
    let listing = list_centers(state, filter).await?;

    let best = nearest::resolve(origin, &listing.centers);
    let ranked = match params.top {
        Some(n) if n > 0 => nearest::rank(origin, &listing.centers, n.min(MAX_TOP)),
        _ => Vec::new(),
    };
    let considered = listing.centers.iter().filter(|c| c.location.is_some()).count();

    info!(
        origin = %origin,
        nearest = best.as_ref().map(|r| r.center.name.as_str()).unwrap_or("none"),
        considered,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/nearest"
    );

    Ok(Json(NearestResponse {
        origin,
        nearest: best,
        ranked,
        centers_considered: considered,
        source: listing.source,
    }))
}

// ─── GET /api/centros ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CentersQuery {
    pub distrito: Option<String>,
    pub nombre: Option<String>,
    pub dni: Option<String>,
}

pub async fn centers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CentersQuery>,
) -> Result<Json<Vec<VotingCenter>>, ApiError> {
    let filter = CenterFilter { distrito: params.distrito, nombre: params.nombre, dni: params.dni };
    let listing = list_centers(state, filter).await?;
    info!(count = listing.centers.len(), source = %listing.source, "GET /api/centros");
    Ok(Json(listing.centers))
}

// ─── GET /api/cronograma ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct CalendarQuery {
    /// Reference date (YYYY-MM-DD); defaults to today in Lima.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub today: NaiveDate,
    pub next_election_day: Option<ElectionEvent>,
    pub general: Vec<ElectionEvent>,
    pub members: Vec<MemberEvent>,
}

pub async fn electoral_calendar(
    Query(params): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let today = match &params.date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
            api_error(StatusCode::BAD_REQUEST, format!("Invalid date '{}': {}", d, e))
        })?,
        None => calendar::today_in_lima(),
    };

    Ok(Json(CalendarResponse {
        today,
        next_election_day: calendar::next_election_day(today),
        general: calendar::general_events(),
        members: calendar::member_events(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centers::types::RecordId;
    use crate::centers::{CenterCache, CenterClient, CenterDirectory, CenterRecord};
    use std::time::Duration;
    use tempfile::TempDir;

    fn record(id: i64, name: &str, lat: Option<f64>, lon: Option<f64>) -> CenterRecord {
        CenterRecord {
            id: RecordId::Int(id),
            nombre: name.into(),
            direccion: None,
            distrito: Some("Lima".into()),
            lat,
            lon,
        }
    }

    fn offline_state(records: &[CenterRecord]) -> (Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut cache = CenterCache::load(dir.path());
        if !records.is_empty() {
            cache.put(&CenterFilter::default(), records);
        }
        let client = CenterClient::new("http://127.0.0.1:1", Duration::from_millis(200));
        let mut directory = CenterDirectory::new(client, cache);
        directory.set_offline(true);
        (Arc::new(AppState { directory }), dir)
    }

    fn query(lat: Option<f64>, lon: Option<f64>, top: Option<usize>) -> Query<NearestQuery> {
        Query(NearestQuery { lat, lon, distrito: None, dni: None, top })
    }

    #[tokio::test]
    async fn test_nearest_from_cache() {
        let (state, _dir) = offline_state(&[
            record(1, "Cusco", Some(-13.532), Some(-71.9675)),
            record(2, "Sin ubicación", None, None),
            record(3, "Cercado", Some(-12.0464), Some(-77.0428)),
        ]);
        let Json(resp) = nearest_center(State(state), query(Some(-12.05), Some(-77.04), Some(5)))
            .await
            .unwrap();
        let best = resp.nearest.unwrap();
        assert_eq!(best.center.id, "3");
        assert_eq!(resp.centers_considered, 2);
        assert_eq!(resp.ranked.len(), 2);
        assert_eq!(resp.source, CenterSource::Cache);
    }

    #[tokio::test]
    async fn test_nearest_none_when_no_coordinates() {
        let (state, _dir) = offline_state(&[record(1, "Sin ubicación", None, None)]);
        let Json(resp) = nearest_center(State(state), query(Some(0.0), Some(0.0), None))
            .await
            .unwrap();
        assert!(resp.nearest.is_none());
        assert!(resp.ranked.is_empty());
    }

    #[tokio::test]
    async fn test_nearest_rejects_bad_coordinates() {
        let (state, _dir) = offline_state(&[]);
        let err = nearest_center(State(state.clone()), query(Some(91.0), Some(0.0), None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = nearest_center(State(state), query(None, Some(0.0), None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearest_cache_miss_is_unavailable() {
        let (state, _dir) = offline_state(&[]);
        let err = nearest_center(State(state), query(Some(-12.0), Some(-77.0), None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_centers_by_dni_uses_its_own_cache_entry() {
        let (state, _dir) = offline_state(&[record(1, "Cercado", Some(-12.0464), Some(-77.0428))]);
        let params = Query(CentersQuery { distrito: None, nombre: None, dni: Some("45678912".into()) });
        let err = centers(State(state.clone()), params).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let params = Query(CentersQuery { distrito: None, nombre: None, dni: None });
        let Json(all) = centers(State(state), params).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_calendar_with_date() {
        let params = Query(CalendarQuery { date: Some("2026-03-01".into()) });
        let Json(resp) = electoral_calendar(params).await.unwrap();
        let next = resp.next_election_day.unwrap();
        assert_eq!(next.date, NaiveDate::from_ymd_opt(2026, 4, 26).unwrap());
        assert_eq!(resp.members.len(), 2);
    }

    #[tokio::test]
    async fn test_calendar_bad_date() {
        let params = Query(CalendarQuery { date: Some("26/04/2026".into()) });
        let err = electoral_calendar(params).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
