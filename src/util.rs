use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Parse a work-order service date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive ISO timestamps and
/// US-style `MM/DD/YYYY`. Anything else yields `None`.
pub fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

/// "Jan 5, 2024". Unparseable input is returned as-is.
pub fn format_date_short(raw: &str) -> String {
    match parse_service_date(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// "Friday, January 5, 2024". Unparseable input is returned as-is.
pub fn format_date_long(raw: &str) -> String {
    match parse_service_date(raw) {
        Some(date) => date.format("%A, %B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn non_slug_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Convert a title to a URL slug.
///
/// Example: "POS Install & Setup" → "pos-install-setup"
pub fn generate_slug(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let stripped = non_slug_chars().replace_all(&lower, "");
    whitespace_runs()
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Cut `text` to `max_len` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head.trim_end())
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Decode a percent-encoded route segment (group pages are keyed by title).
///
/// Unlike form decoding, `+` stays a literal plus.
pub fn decode_route_title(raw: &str) -> String {
    let escaped = raw.replace('+', "%2B").replace('&', "%26");
    url::form_urlencoded::parse(format!("t={}", escaped).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_service_date("2024-01-05"), jan5);
        assert_eq!(parse_service_date("2024-01-05T14:30:00Z"), jan5);
        assert_eq!(parse_service_date("2024-01-05T14:30:00"), jan5);
        assert_eq!(parse_service_date("01/05/2024"), jan5);
        assert_eq!(parse_service_date("not a date"), None);
        assert_eq!(parse_service_date(""), None);
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date_short("2024-01-05"), "Jan 5, 2024");
        assert_eq!(format_date_long("2024-01-05"), "Friday, January 5, 2024");
        assert_eq!(format_date_short("sometime"), "sometime");
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("POS Install & Setup"), "pos-install-setup");
        assert_eq!(generate_slug("Network  Cabling - Phase 2"), "network-cabling---phase-2");
        assert_eq!(generate_slug("simple"), "simple");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("replace the printer", 7), "replace...");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("networking"), "Networking");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_decode_route_title() {
        assert_eq!(decode_route_title("POS%20Install%20%26%20Setup"), "POS Install & Setup");
        assert_eq!(decode_route_title("C++%20Training"), "C++ Training");
        assert_eq!(decode_route_title("Plain"), "Plain");
    }
}
