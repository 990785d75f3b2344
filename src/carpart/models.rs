//! Data models for Car-Part.com searches, listings, and price summaries.

use serde::{Deserialize, Serialize};

/// One part search for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub year: String,
    pub make: String,
    pub model: String,
    pub zip_code: String,
    pub part_name: String,
}

impl SearchCriteria {
    /// Creates search criteria for a single part.
    pub fn new(
        part_name: impl Into<String>,
        year: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            year: year.into(),
            make: make.into(),
            model: model.into(),
            zip_code: zip_code.into(),
            part_name: part_name.into(),
        }
    }
}

/// Ordered form fields; setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Sets every field of `other` over this one.
    pub fn merge(&mut self, other: &FormData) {
        for (name, value) in &other.fields {
            self.set(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Encodes the fields as an `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(n, v)| format!("{}={}", urlencoding::encode(n), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.set(name, value);
        }
        form
    }
}

/// A single row from the marketplace results table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Part name that was searched (not read from the page)
    pub part_name: String,
    pub year: String,
    pub description: String,
    pub grade: String,
    pub stock_number: String,
    /// Price text as shown, e.g. "$125" or "Call"
    pub price: String,
    pub vendor_name: String,
    /// "<city>, <state/province code>"
    pub location: String,
    pub phone: String,
    pub distance_miles: String,
}

impl Listing {
    /// Numeric price, if the price text starts with a dollar amount.
    pub fn price_value(&self) -> Option<f64> {
        crate::carpart::stats::parse_price(&self.price)
    }
}

/// Aggregate pricing over the deduplicated listings for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub part_name: String,
    pub average_price: Option<f64>,
    pub low_price: Option<f64>,
    pub listing_count: usize,
}

impl PriceSummary {
    /// Summary for a part that produced no listings.
    pub fn empty(part_name: impl Into<String>) -> Self {
        Self { part_name: part_name.into(), average_price: None, low_price: None, listing_count: 0 }
    }

    pub fn has_listings(&self) -> bool {
        self.listing_count > 0
    }
}

/// How a single part search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PartOutcome {
    /// A results page was reached; may still hold zero listings.
    Listings(Vec<Listing>),
    /// The marketplace flagged the vehicle/part combination as invalid.
    Invalid,
    /// The submission failed in transit; the message is the cause.
    TransportFailed(String),
}

impl PartOutcome {
    /// Listings carried by this outcome; empty for the non-listing variants.
    pub fn into_listings(self) -> Vec<Listing> {
        match self {
            PartOutcome::Listings(listings) => listings,
            PartOutcome::Invalid | PartOutcome::TransportFailed(_) => Vec::new(),
        }
    }

    pub fn listing_count(&self) -> usize {
        match self {
            PartOutcome::Listings(listings) => listings.len(),
            _ => 0,
        }
    }
}
