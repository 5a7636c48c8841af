//! Electoral calendar for the 2026 general elections.
//!
//! Dates are calendar days in Peru (America/Lima). The table is fixed at
//! build time.

use chrono::{NaiveDate, Utc};
use chrono_tz::America::Lima;
use serde::Serialize;

struct GeneralRow {
    ymd: (i32, u32, u32),
    event: &'static str,
    election_day: bool,
}

struct MemberRow {
    ymd: (i32, u32, u32),
    title: &'static str,
    description: &'static str,
}

const GENERAL: &[GeneralRow] = &[
    GeneralRow { ymd: (2026, 1, 11), event: "Fecha límite para renuncia de candidatos y retiro de listas.", election_day: false },
    GeneralRow { ymd: (2026, 1, 12), event: "Fecha límite para la presentación de solicitudes de inscripción de fórmulas y listas de candidatos.", election_day: false },
    GeneralRow { ymd: (2026, 1, 13), event: "Fecha límite para resolver exclusiones y tachas en primera instancia.", election_day: false },
    GeneralRow { ymd: (2026, 1, 14), event: "Fecha límite para que las candidaturas queden inscritas.", election_day: false },
    GeneralRow { ymd: (2026, 2, 1), event: "Fecha límite para publicación de fórmulas y listas admitidas.", election_day: false },
    GeneralRow { ymd: (2026, 2, 2), event: "Fecha límite para exclusión por situación jurídica del candidato.", election_day: false },
    GeneralRow { ymd: (2026, 2, 7), event: "Día de las Elecciones (1ra vuelta).", election_day: true },
    GeneralRow { ymd: (2026, 2, 14), event: "Fecha límite para resolver apelaciones sobre exclusión y tachas.", election_day: false },
    GeneralRow { ymd: (2026, 3, 15), event: "Fecha límite para que alianzas electorales logren inscripción.", election_day: false },
    GeneralRow { ymd: (2026, 4, 26), event: "Día de Elecciones (2da vuelta).", election_day: true },
];

const MEMBERS: &[MemberRow] = &[
    MemberRow {
        ymd: (2026, 2, 7),
        title: "Día de Elecciones – Primera Vuelta.",
        description: "Los miembros de mesa deben presentarse desde temprano ese día.",
    },
    MemberRow {
        ymd: (2026, 4, 26),
        title: "Día de Elecciones – Segunda Vuelta (si corresponde).",
        description: "Los mismos miembros de mesa participan nuevamente.",
    },
];

const MONTHS_ES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

/// A general electoral milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionEvent {
    pub date: NaiveDate,
    pub month: &'static str,
    pub event: &'static str,
    pub election_day: bool,
}

/// A milestone for table members (miembros de mesa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEvent {
    pub date: NaiveDate,
    pub title: &'static str,
    pub description: &'static str,
}

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn month_name(d: NaiveDate) -> &'static str {
    use chrono::Datelike;
    MONTHS_ES[d.month0() as usize]
}

/// All general events in date order.
pub fn general_events() -> Vec<ElectionEvent> {
    let mut events: Vec<ElectionEvent> = GENERAL
        .iter()
        .map(|row| {
            let d = date(row.ymd);
            ElectionEvent { date: d, month: month_name(d), event: row.event, election_day: row.election_day }
        })
        .collect();
    events.sort_by_key(|e| e.date);
    events
}

/// All table-member events in date order.
pub fn member_events() -> Vec<MemberEvent> {
    let mut events: Vec<MemberEvent> = MEMBERS
        .iter()
        .map(|row| MemberEvent { date: date(row.ymd), title: row.title, description: row.description })
        .collect();
    events.sort_by_key(|e| e.date);
    events
}

/// General events on or after `today`.
pub fn upcoming(today: NaiveDate) -> Vec<ElectionEvent> {
    general_events().into_iter().filter(|e| e.date >= today).collect()
}

/// The next election day on or after `today`, if any remain.
pub fn next_election_day(today: NaiveDate) -> Option<ElectionEvent> {
    upcoming(today).into_iter().find(|e| e.election_day)
}

/// Today's date in Lima.
pub fn today_in_lima() -> NaiveDate {
    Utc::now().with_timezone(&Lima).date_naive()
}
