//! Privacy scrubbing for free-text location fields.
//!
//! Raw city fields in the export sometimes carry full street addresses. This
//! is a best-effort redaction heuristic, not a guarantee.

use std::sync::OnceLock;

use regex::Regex;

/// Shown in place of anything that still looks like an address.
pub const SERVICE_LOCATION: &str = "Service Location";

fn leading_address() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // House number, then (when a comma is present) the street part up to it.
    RE.get_or_init(|| Regex::new(r"^[0-9]+\s+(?:[^,]*,\s*)?").expect("static regex"))
}

fn has_digit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]").expect("static regex"))
}

fn street_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(street|st|avenue|ave|road|rd|drive|dr|lane|ln|boulevard|blvd)$")
            .expect("static regex")
    })
}

/// Strip address fragments from `city`, falling back to [`SERVICE_LOCATION`].
///
/// Total: never empty, never fails. `_state` is accepted for call-site
/// symmetry with the "City, ST" display string.
pub fn sanitize_city(city: &str, _state: &str) -> String {
    let cleaned = leading_address().replace(city, "");
    let cleaned = cleaned.trim();

    // Length in UTF-16 units, so one astral character (e.g. an emoji) passes
    if cleaned.encode_utf16().count() < 2 {
        return SERVICE_LOCATION.to_string();
    }

    if has_digit().is_match(cleaned) && !street_suffix().is_match(cleaned) {
        return SERVICE_LOCATION.to_string();
    }

    cleaned.to_string()
}

/// "City, ST" as shown on tiles and used for search.
pub fn display_location(city: &str, state: &str) -> String {
    format!("{}, {}", sanitize_city(city, state), state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_city_passes_through() {
        assert_eq!(sanitize_city("Nashville", "TN"), "Nashville");
        assert_eq!(sanitize_city("  Knoxville ", "TN"), "Knoxville");
    }

    #[test]
    fn test_house_number_is_stripped_from_street() {
        assert_eq!(sanitize_city("123 Main Street", "TN"), "Main Street");
    }

    #[test]
    fn test_street_before_comma_is_dropped() {
        assert_eq!(sanitize_city("455 Oak Ave, Franklin", "TN"), "Franklin");
    }

    #[test]
    fn test_comma_free_address_keeps_street_and_city() {
        // Without a comma only the house number is stripped
        assert_eq!(sanitize_city("123 Main St Nashville", "TN"), "Main St Nashville");
    }

    #[test]
    fn test_single_astral_character_is_kept() {
        assert_eq!(sanitize_city("\u{1F3D9}", "TN"), "\u{1F3D9}");
        assert_eq!(sanitize_city("é", "TN"), SERVICE_LOCATION);
    }

    #[test]
    fn test_embedded_digit_without_suffix_is_redacted() {
        assert_eq!(sanitize_city("123 Apt 4B", "TN"), SERVICE_LOCATION);
        assert_eq!(sanitize_city("Suite 210", "GA"), SERVICE_LOCATION);
    }

    #[test]
    fn test_embedded_digit_with_street_suffix_is_kept() {
        assert_eq!(sanitize_city("12 5th Ave", "NY"), "5th Ave");
        assert_eq!(sanitize_city("Highway 70 Rd", "TN"), "Highway 70 Rd");
    }

    #[test]
    fn test_empty_and_tiny_inputs() {
        assert_eq!(sanitize_city("", "TN"), SERVICE_LOCATION);
        assert_eq!(sanitize_city("X", "TN"), SERVICE_LOCATION);
        assert_eq!(sanitize_city("   ", "TN"), SERVICE_LOCATION);
        assert_eq!(sanitize_city("42 ", "TN"), SERVICE_LOCATION);
    }

    #[test]
    fn test_never_returns_empty() {
        let inputs = [
            "", " ", ",", "1", "1 ", "1 ,", "99 Elm, ", "0 0 0", "ü", "Été",
            "123 Main Street, 4", "2B", "  7  ,  ",
        ];
        for input in inputs {
            assert!(!sanitize_city(input, "VT").is_empty(), "empty for {input:?}");
        }
    }

    #[test]
    fn test_display_location() {
        assert_eq!(display_location("Burlington", "VT"), "Burlington, VT");
        assert_eq!(display_location("", "VT"), "Service Location, VT");
    }
}
