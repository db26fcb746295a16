use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Body of `POST /api/meal`. Anything else the client sends (e.g. `at`) is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    #[serde(default)]
    pub id: String,
    pub comment: Option<String>,
}

/// Query string of `GET /api/meals`.
#[derive(Debug, Default, Deserialize)]
pub struct MealsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Inclusive time window; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl TimeRange {
    #[allow(dead_code)]
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

impl MealsQuery {
    pub fn into_range(self) -> Result<TimeRange, String> {
        let from = parse_bound("from", self.from.as_deref())?;
        let to = parse_bound("to", self.to.as_deref())?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err("'from' date cannot be after 'to' date.".into());
            }
        }
        Ok(TimeRange { from, to })
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<OffsetDateTime>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => OffsetDateTime::parse(v, &Rfc3339)
            .map(Some)
            .map_err(|_| format!("Invalid '{}' date format. Use RFC 3339.", name)),
    }
}
