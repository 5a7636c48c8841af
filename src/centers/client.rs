//! HTTP client for the election backend (`/api/centros`, `/api/mesas`, `/api/partidos`,
//! `/api/candidatos`).

use super::types::{
    CandidateFilter, Candidato, CandidatoDetalle, CenterDetail, CenterError, CenterFilter,
    CenterRecord, Mesa, Partido,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("Comitia/", env!("CARGO_PKG_VERSION"));

/// Blocking client bound to one backend base URL.
#[derive(Clone)]
pub struct CenterClient {
    agent: ureq::Agent,
    base_url: String,
}

impl CenterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /api/centros`, forwarding any filters as query parameters.
    pub fn list_centers(&self, filter: &CenterFilter) -> Result<Vec<CenterRecord>, CenterError> {
        let url = format!("{}/api/centros", self.base_url);
        let mut req = self.agent.get(&url);
        if let Some(d) = filter.distrito.as_deref() {
            req = req.query("distrito", d);
        }
        if let Some(n) = filter.nombre.as_deref() {
            req = req.query("nombre", n);
        }
        if let Some(dni) = filter.dni.as_deref() {
            req = req.query("dni", dni);
        }
        let raw: Vec<serde_json::Value> = fetch_json(req, "voting centers")?;
        let total = raw.len();
        let records: Vec<CenterRecord> = raw
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        let skipped = total - records.len();
        if skipped > 0 {
            debug!(skipped, total, "dropped malformed center records");
        }
        Ok(records)
    }

    /// `GET /api/centro/{id}`.
    pub fn get_center(&self, id: &str) -> Result<CenterRecord, CenterError> {
        let url = format!("{}/api/centro/{}", self.base_url, encode_segment(id));
        fetch_json(self.agent.get(&url), &format!("voting center '{}'", id))
    }

    /// `GET /api/mesas/{center_id}`.
    pub fn list_mesas(&self, center_id: &str) -> Result<Vec<Mesa>, CenterError> {
        let url = format!("{}/api/mesas/{}", self.base_url, encode_segment(center_id));
        fetch_json(self.agent.get(&url), &format!("tables for center '{}'", center_id))
    }

    /// A center plus its voting tables.
    pub fn center_detail(&self, id: &str) -> Result<CenterDetail, CenterError> {
        let center = self.get_center(id)?.to_voting_center();
        let mesas = self.list_mesas(id)?;
        Ok(CenterDetail { center, mesas })
    }

    /// `GET /api/candidatos`, forwarding any filters as query parameters.
    pub fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidato>, CenterError> {
        let url = format!("{}/api/candidatos", self.base_url);
        let mut req = self.agent.get(&url);
        if let Some(r) = filter.region.as_deref() {
            req = req.query("region", r);
        }
        if let Some(c) = filter.cargo.as_deref() {
            req = req.query("cargo", c);
        }
        if let Some(id) = filter.id_agrupacion {
            req = req.query("id_agrupacion", &id.to_string());
        }
        fetch_json(req, "candidates")
    }

    /// `GET /api/candidatos/{id}`.
    pub fn get_candidate(&self, id: &str) -> Result<CandidatoDetalle, CenterError> {
        let url = format!("{}/api/candidatos/{}", self.base_url, encode_segment(id));
        fetch_json(self.agent.get(&url), &format!("candidate '{}'", id))
    }

    /// `GET /api/partidos`.
    pub fn list_parties(&self) -> Result<Vec<Partido>, CenterError> {
        let url = format!("{}/api/partidos", self.base_url);
        fetch_json(self.agent.get(&url), "political parties")
    }
}

fn fetch_json<T: DeserializeOwned>(req: ureq::Request, what: &str) -> Result<T, CenterError> {
    debug!(url = req.url(), "GET");
    match req.call() {
        Ok(resp) => resp
            .into_json::<T>()
            .map_err(|e| CenterError::InvalidResponse(e.to_string())),
        Err(ureq::Error::Status(404, _)) => Err(CenterError::NotFound(what.to_string())),
        Err(ureq::Error::Status(code, _)) => Err(CenterError::Status(code)),
        Err(e) => Err(CenterError::Network(e.to_string())),
    }
}

/// Percent-encode a single path segment.
fn encode_segment(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
