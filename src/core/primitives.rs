use chrono::{NaiveDate, NaiveDateTime};

/// Normalizes a raw header cell into a column name.
///
/// Strips a leading UTF-8 BOM, trims the ends and collapses inner whitespace
/// runs (including non-breaking spaces) into a single ASCII space.
#[must_use]
pub fn normalize_column_name(raw: &str) -> String {
    let without_bom = raw.trim_start_matches('\u{feff}');
    without_bom
        .split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn is_missing_cell(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed.eq_ignore_ascii_case("na")
}

#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Parses `YYYY-MM-DD`, optionally followed by a time part.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Returns `true` for ISO-3166 alpha-3 shaped codes (`IND`, `USA`).
///
/// Aggregate codes such as `OWID_WRL` do not qualify.
#[must_use]
pub fn is_iso3_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
