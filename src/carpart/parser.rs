//! HTML parsing for Car-Part.com pages: hidden form fields, response
//! classification, and listings-table extraction.

use super::columns::{Column, ColumnMap, TableClassifier};
use super::models::{FormData, Listing};
use super::selectors::{form, results};
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Body text that marks a rejected vehicle/part combination.
pub const INVALID_MARKER: &str = "INVALID";

/// Radio value the interchange page uses for "no selection".
const NO_INTERCHANGE: &str = "None";

/// Annotations the marketplace appends to yard names.
const VENDOR_SUFFIXES: &[&str] =
    &[" - PRP Freight, ARA, CDC", " - PRP Freight, CDC", " - CDC", " - ARA"];

/// Fallback vendor length when the dealer cell has no country marker.
const VENDOR_FALLBACK_CHARS: usize = 60;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[\d,.]+").unwrap());

static VENDOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?:USA-|Can-)").unwrap());

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:USA|Can)-(\w+)\(([^)]+)\)").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d-]{9,}").unwrap());

static CO2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Estimated CO2e Savings:\s*\d+kg").unwrap());

/// What a search submission returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPage {
    /// The marketplace rejected the search.
    Invalid,
    /// An interchange choice must be submitted before listings are shown.
    Interchange { choice: String, hidden: FormData },
    /// A results page (possibly without a listings table).
    Results(Vec<Listing>),
}

/// Classifies a search response and extracts listings when it is a results page.
pub fn parse_search_page(
    html: &str,
    part_name: &str,
    classifier: &impl TableClassifier,
) -> SearchPage {
    let document = Html::parse_document(html);

    if is_invalid(&document) {
        debug!("Marketplace flagged search for '{}' as invalid", part_name);
        return SearchPage::Invalid;
    }

    if let Some(choice) = interchange_choice(&document) {
        debug!("Interchange page for '{}', choosing {}", part_name, choice);
        return SearchPage::Interchange { choice, hidden: first_form_hidden_fields(&document) };
    }

    SearchPage::Results(extract_listings(&document, part_name, classifier))
}

/// Parses a results page without interchange detection.
pub fn parse_results_page(
    html: &str,
    part_name: &str,
    classifier: &impl TableClassifier,
) -> Vec<Listing> {
    let document = Html::parse_document(html);
    extract_listings(&document, part_name, classifier)
}

/// Extracts the hidden inputs of the page's first form.
pub fn parse_hidden_fields(html: &str) -> FormData {
    first_form_hidden_fields(&Html::parse_document(html))
}

fn first_form_hidden_fields(document: &Html) -> FormData {
    let mut fields = FormData::new();
    let Some(first_form) = document.select(&form::FORM).next() else {
        return fields;
    };

    for input in first_form.select(&form::HIDDEN_INPUT) {
        let Some(name) = input.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        fields.set(name, input.value().attr("value").unwrap_or(""));
    }

    trace!("Collected {} hidden fields", fields.len());
    fields
}

fn is_invalid(document: &Html) -> bool {
    document.root_element().text().any(|t| t.contains(INVALID_MARKER))
}

/// First radio value that is present and not the "None" sentinel.
fn interchange_choice(document: &Html) -> Option<String> {
    document
        .select(&form::RADIO_INPUT)
        .filter_map(|r| r.value().attr("value"))
        .find(|v| !v.is_empty() && *v != NO_INTERCHANGE)
        .map(String::from)
}

/// Finds the first table the classifier accepts and turns its rows into listings.
fn extract_listings(
    document: &Html,
    part_name: &str,
    classifier: &impl TableClassifier,
) -> Vec<Listing> {
    for table in document.select(&results::TABLE) {
        let rows = own_rows(table);
        let Some(header_row) = rows.first() else {
            continue;
        };

        let headers: Vec<String> =
            own_cells(*header_row, &results::HEADER_CELL).into_iter().map(cell_text).collect();

        let Some(columns) = classifier.classify(&headers) else {
            continue;
        };

        let listings: Vec<Listing> = rows[1..]
            .iter()
            .filter_map(|row| {
                let cells: Vec<String> =
                    own_cells(*row, &results::DATA_CELL).into_iter().map(cell_text).collect();
                if cells.len() < columns.width() {
                    return None;
                }
                Some(parse_row(&cells, &columns, part_name))
            })
            .collect();

        debug!("Parsed {} listings for '{}'", listings.len(), part_name);
        return listings;
    }

    debug!("No listings table found for '{}'", part_name);
    Vec::new()
}

fn parse_row(cells: &[String], columns: &ColumnMap, part_name: &str) -> Listing {
    let dealer = columns.cell(cells, Column::DealerInfo);

    Listing {
        part_name: part_name.to_string(),
        year: parse_year(cells.first().map(String::as_str).unwrap_or("")),
        description: clean_description(columns.cell(cells, Column::Description)),
        grade: columns.cell(cells, Column::Grade).to_string(),
        stock_number: columns.cell(cells, Column::StockNumber).to_string(),
        price: parse_price_text(columns.cell(cells, Column::Price)),
        vendor_name: parse_vendor(dealer),
        location: parse_location(dealer),
        phone: parse_phone(dealer),
        distance_miles: columns.cell(cells, Column::Distance).to_string(),
    }
}

/// Leading four-digit model year, e.g. "2017Fuel TankAudi A6" -> "2017".
fn parse_year(text: &str) -> String {
    text.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit())).unwrap_or("").to_string()
}

fn clean_description(text: &str) -> String {
    CO2_RE.replace_all(text, "").trim().to_string()
}

/// First dollar amount in the cell, or the raw text ("Call") when there is none.
fn parse_price_text(text: &str) -> String {
    PRICE_RE.find(text).map(|m| m.as_str()).unwrap_or(text).to_string()
}

fn parse_vendor(dealer: &str) -> String {
    let mut vendor = match VENDOR_RE.captures(dealer).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => dealer.chars().take(VENDOR_FALLBACK_CHARS).collect(),
    };
    for suffix in VENDOR_SUFFIXES {
        vendor = vendor.replace(suffix, "");
    }
    vendor
}

/// "USA-NY(Buffalo)" -> "Buffalo, NY".
fn parse_location(dealer: &str) -> String {
    LOCATION_RE
        .captures(dealer)
        .and_then(|c| Some(format!("{}, {}", c.get(2)?.as_str(), c.get(1)?.as_str())))
        .unwrap_or_default()
}

fn parse_phone(dealer: &str) -> String {
    PHONE_RE.find(dealer).map(|m| m.as_str().to_string()).unwrap_or_default()
}

/// Rows that belong to `table` itself, not to tables nested inside it.
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    table
        .select(&results::ROW)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "table")
                .is_some_and(|owner| owner.id() == table.id())
        })
        .collect()
}

/// Direct child cells of a row matching `cell`.
fn own_cells<'a>(row: ElementRef<'a>, cell: &Selector) -> Vec<ElementRef<'a>> {
    row.children().filter_map(ElementRef::wrap).filter(|e| cell.matches(e)).collect()
}

/// Cell text with each text node trimmed and joined without separators.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}
