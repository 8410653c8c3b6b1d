//! YADA Tools module
//!
//! Tool implementations behind the MCP server. Each takes the tracker and
//! plain arguments and returns a serializable response or an error message.

pub mod foods;
pub mod log;
pub mod profile;
pub mod status;

use chrono::NaiveDate;

use crate::models::FoodKind;

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    let date = date.trim();
    if date.is_empty() {
        return Err("date is required".to_string());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", date))
}

/// Parse an optional kind filter. Missing, empty and "all" mean no filter.
pub fn parse_kind(kind: Option<&str>) -> Result<Option<FoodKind>, String> {
    match kind.map(str::trim) {
        None | Some("") => Ok(None),
        Some(k) if k.eq_ignore_ascii_case("all") => Ok(None),
        Some(k) => FoodKind::from_str(k)
            .map(Some)
            .ok_or_else(|| format!("Unknown food kind '{}': use basic, composite or all", k)),
    }
}
