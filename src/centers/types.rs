//! Core types for the voting-center subsystem.

use crate::geo::GeoPoint;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// A polling location, ready for resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingCenter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    /// `None` when the backend sent missing or out-of-range coordinates.
    pub location: Option<GeoPoint>,
}

/// Where a center listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CenterSource {
    Api,
    Cache,
    /// Expired cache entry, served because the backend was unreachable.
    StaleCache,
}

impl fmt::Display for CenterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "API"),
            Self::Cache => write!(f, "Cache"),
            Self::StaleCache => write!(f, "Cache (stale)"),
        }
    }
}

/// A listing plus its provenance.
#[derive(Debug, Clone)]
pub struct CenterListing {
    pub centers: Vec<VotingCenter>,
    pub source: CenterSource,
}

/// Optional filters forwarded to `/api/centros`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterFilter {
    pub distrito: Option<String>,
    pub nombre: Option<String>,
    /// Elector's DNI; the backend narrows the listing to that elector's center.
    pub dni: Option<String>,
}

impl CenterFilter {
    /// Cache key for this filter. Unfiltered listings use `"*"`.
    pub fn cache_key(&self) -> String {
        fn norm(v: &Option<String>) -> String {
            v.as_deref().unwrap_or("").trim().to_lowercase()
        }
        match (&self.distrito, &self.nombre, &self.dni) {
            (None, None, None) => "*".into(),
            _ => format!(
                "distrito={}|nombre={}|dni={}",
                norm(&self.distrito),
                norm(&self.nombre),
                norm(&self.dni),
            ),
        }
    }
}

/// Optional filters forwarded to `/api/candidatos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub region: Option<String>,
    pub cargo: Option<String>,
    pub id_agrupacion: Option<i64>,
}

// ─── Wire records ───────────────────────────────────────────────

/// Identifiers arrive as integers from one backend and UUID strings from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One element of the `/api/centros` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterRecord {
    pub id: RecordId,
    pub nombre: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub distrito: Option<String>,
    #[serde(default, alias = "latitud", deserialize_with = "lenient_coord")]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitud", alias = "lng", deserialize_with = "lenient_coord")]
    pub lon: Option<f64>,
}

impl CenterRecord {
    /// Convert to a [`VotingCenter`], dropping coordinates that do not form a valid point.
    pub fn to_voting_center(&self) -> VotingCenter {
        let location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => None,
        };
        VotingCenter {
            id: self.id.to_string(),
            name: self.nombre.trim().to_string(),
            address: self.direccion.clone(),
            district: self.distrito.clone(),
            location,
        }
    }
}

/// A voting table inside a center (`/api/mesas/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesa {
    pub id: RecordId,
    pub numero: String,
    #[serde(default)]
    pub aula: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub piso: Option<String>,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coord")]
    pub lon: Option<f64>,
}

/// A registered political party (`/api/partidos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partido {
    pub id_partido: RecordId,
    pub nombre_partido: String,
    #[serde(default)]
    pub siglas: Option<String>,
    #[serde(default)]
    pub ideologia: Option<String>,
    #[serde(default)]
    pub sitio_web: Option<String>,
    #[serde(default)]
    pub fecha_inscripcion: Option<String>,
    #[serde(default)]
    pub personero_titular: Option<String>,
}

/// A candidate as listed by `/api/candidatos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidato {
    pub id: RecordId,
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub profesion: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Party or alliance name.
    #[serde(default)]
    pub agrupacion: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
}

/// The office a candidate runs for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postulacion {
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub ambito: Option<String>,
    #[serde(default)]
    pub numero: Option<i64>,
}

/// Full candidate record from `/api/candidatos/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatoDetalle {
    pub id: RecordId,
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub profesion: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub agrupacion: Option<String>,
    #[serde(default)]
    pub hoja_vida_url: Option<String>,
    #[serde(default)]
    pub postulacion: Option<Postulacion>,
    /// Government plan, attached for presidential candidates only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_gobierno: Option<serde_json::Value>,
}

/// A center together with its voting tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterDetail {
    pub center: VotingCenter,
    pub mesas: Vec<Mesa>,
}

/// Accept a number, a numeric string, or null. Anything else reads as missing.
fn lenient_coord<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accept a string or a number, rendering numbers as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Center listing errors.
#[derive(Debug, Error)]
pub enum CenterError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Backend returned HTTP {0}")]
    Status(u16),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("No cached voting centers available")]
    CacheMiss,
}
