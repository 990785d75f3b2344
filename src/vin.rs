//! VIN validation and search-term cleanup for raw part categories.

use regex_lite::Regex;
use std::sync::LazyLock;

/// 17 characters, no I, O or Q.
static VIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap());

static ID_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*ID\s+\S+.*$").unwrap());

static TRAILING_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d{3,}\s*$").unwrap());

/// Uppercased, trimmed form of a VIN as typed.
pub fn normalize_vin(vin: &str) -> String {
    vin.trim().to_uppercase()
}

/// Returns true if the string is a well-formed 17-character VIN.
pub fn validate_vin(vin: &str) -> bool {
    VIN_RE.is_match(&normalize_vin(vin))
}

/// Strips inventory-system suffixes from a part category before searching.
///
/// "Chassis Brain Box; on-board computer" -> "Chassis Brain Box",
/// "Heat/AC Controller rear, ID 4G0820043" -> "Heat/AC Controller rear",
/// "Fuel Tank 59452" -> "Fuel Tank".
pub fn clean_search_term(term: &str) -> String {
    let term = term.split(';').next().unwrap_or_default();
    let term = ID_SUFFIX_RE.replace(term, "");
    let term = TRAILING_CODE_RE.replace(&term, "");
    term.trim().trim_end_matches(',').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vin() {
        assert!(validate_vin("JT3HN86R0X0197825"));
        assert!(validate_vin("  jt3hn86r0x0197825 "));
        assert!(!validate_vin("JT3HN86R0X019782"));
        assert!(!validate_vin("JT3HN86R0X01978255"));
        // I, O and Q never appear in a VIN
        assert!(!validate_vin("JT3HN86R0X019782O"));
        assert!(!validate_vin("JT3HN86R0X0I97825"));
        assert!(!validate_vin("JT3HN-6R0X0197825"));
        assert!(!validate_vin(""));
    }

    #[test]
    fn test_normalize_vin() {
        assert_eq!(normalize_vin(" wauzzz4g1hn012345\n"), "WAUZZZ4G1HN012345");
    }

    #[test]
    fn test_clean_search_term_semicolon() {
        assert_eq!(clean_search_term("Chassis Brain Box; on-board computer"), "Chassis Brain Box");
    }

    #[test]
    fn test_clean_search_term_id_suffix() {
        assert_eq!(
            clean_search_term("Heat/AC Controller rear, ID 4G0820043 (w/o heated seats)"),
            "Heat/AC Controller rear"
        );
    }

    #[test]
    fn test_clean_search_term_trailing_code() {
        assert_eq!(clean_search_term("Fuel Tank 59452"), "Fuel Tank");
        assert_eq!(clean_search_term("Fuel Tank 590"), "Fuel Tank");
        assert_eq!(clean_search_term("Engine 12"), "Engine 12");
    }

    #[test]
    fn test_clean_search_term_trailing_comma() {
        assert_eq!(clean_search_term("  Door Mirror, 601 "), "Door Mirror");
        assert_eq!(clean_search_term("Hood,"), "Hood");
    }

    #[test]
    fn test_clean_search_term_empty() {
        assert_eq!(clean_search_term(""), "");
        assert_eq!(clean_search_term("; notes only"), "");
    }
}
