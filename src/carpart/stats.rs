//! Listing deduplication and price statistics.

use super::models::{Listing, PriceSummary};
use std::collections::HashSet;

/// Drops listings whose `(vendor_name, stock_number)` was already seen, keeping order.
pub fn dedupe_listings(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert((l.vendor_name.clone(), l.stock_number.clone())))
        .collect()
}

/// Parses the leading dollar amount of a price cell.
///
/// Anything after the first digit/comma/dot run is ignored, so `"$125actual"`
/// yields `125.0`. Text without digits ("Call", "$Call") yields `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let rest = text.trim().trim_start_matches('$');
    let start = rest.find(|c: char| c.is_ascii_digit() || c == ',' || c == '.')?;
    let run: String = rest[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    run.parse().ok()
}

/// Deduplicates `listings` and summarizes their prices for `part_name`.
pub fn summarize(part_name: &str, listings: Vec<Listing>) -> PriceSummary {
    let unique = dedupe_listings(listings);
    let prices: Vec<f64> = unique.iter().filter_map(Listing::price_value).collect();

    let (average_price, low_price) = if prices.is_empty() {
        (None, None)
    } else {
        let average = prices.iter().sum::<f64>() / prices.len() as f64;
        let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
        (Some(average), Some(low))
    };

    PriceSummary { part_name: part_name.to_string(), average_price, low_price, listing_count: unique.len() }
}
