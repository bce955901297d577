//! Birth-date sort keys.
//!
//! Sibling ordering only needs a total order over dates, so a date is reduced to the number of
//! days since the start of the common era. Missing or unparseable dates map to `0` and therefore
//! sort before every real date; real dates before year 1 share the key `1`.

use chrono::{Datelike, NaiveDate};

/// Qualifiers that genealogy sources put in front of approximate dates.
const QUALIFIERS: [&str; 4] = ["ABT", "AFT", "BEF", "~"];

pub type SortKey = i64;

pub fn sort_key(date: Option<&str>) -> SortKey {
    date.and_then(parse)
        .map(|d| i64::from(d.num_days_from_ce()).max(1))
        .unwrap_or(0)
}

/// Accepts `YYYY-MM-DD`, `D MON YYYY`, `MON YYYY` and `YYYY`, optionally prefixed by one of the
/// approximate-date qualifiers.
pub fn parse(raw: &str) -> Option<NaiveDate> {
    let text = strip_qualifier(raw.trim());
    if text.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%d %b %Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {text}"), "%d %b %Y") {
        return Some(d);
    }
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

fn strip_qualifier(text: &str) -> &str {
    let upper = text.to_ascii_uppercase();
    for q in QUALIFIERS {
        if upper.starts_with(q) {
            return text[q.len()..].trim_start_matches(['.', ' ']);
        }
    }
    text
}
