//! Output formatting for listings and price summaries (table, JSON, CSV).

use crate::carpart::{Listing, PriceSummary};
use crate::config::OutputFormat;
use crate::export::{to_csv, Record};
use crate::vinmatch::VehicleAttributes;

const LISTING_CSV_HEADER: &str =
    "part_name,year,description,grade,stock_number,price,vendor,location,phone,distance_miles";

const SUMMARY_CSV_HEADER: &str = "part_name,average_price,low_price,listing_count";

/// Formats search results for stdout.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a decoded vehicle.
    pub fn format_vehicle(&self, vehicle: &VehicleAttributes) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(vehicle).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_vehicle(vehicle),
            OutputFormat::Csv => to_csv(&[Record::from(vehicle)]).trim_end().to_string(),
        }
    }

    /// Formats marketplace listings.
    pub fn format_listings(&self, listings: &[Listing]) -> String {
        if listings.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => LISTING_CSV_HEADER.to_string(),
                OutputFormat::Table => "No listings found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(listings).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_listings(listings),
            OutputFormat::Csv => {
                let records: Vec<Record> = listings.iter().map(Record::from).collect();
                to_csv(&records).trim_end().to_string()
            }
        }
    }

    /// Formats per-part price summaries.
    pub fn format_summaries(&self, summaries: &[PriceSummary]) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_summaries(summaries),
            OutputFormat::Csv => self.csv_summaries(summaries),
        }
    }

    // Table formatting

    fn table_vehicle(&self, vehicle: &VehicleAttributes) -> String {
        let mut lines = Vec::new();

        lines.push(format!("VIN:          {}", vehicle.vin));
        lines.push(format!("Vehicle:      {}", vehicle.title()));

        let optional = [
            ("Trim:         ", &vehicle.trim),
            ("Engine:       ", &vehicle.engine),
            ("Transmission: ", &vehicle.transmission),
            ("Body:         ", &vehicle.body_style),
            ("Drive:        ", &vehicle.drive_type),
            ("Fuel:         ", &vehicle.fuel_type),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("{}{}", label, value));
            }
        }

        lines.join("\n")
    }

    fn table_listings(&self, listings: &[Listing]) -> String {
        let part_width = 22;
        let price_width = 10;
        let grade_width = 5;
        let vendor_width = 30;
        let location_width = 20;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<part_width$}  {:<price_width$}  {:<grade_width$}  {:<vendor_width$}  {:<location_width$}  {}",
            "Part", "Price", "Grade", "Vendor", "Location", "Miles"
        ));
        lines.push(format!(
            "{:-<part_width$}  {:-<price_width$}  {:-<grade_width$}  {:-<vendor_width$}  {:-<location_width$}  {:-<5}",
            "", "", "", "", "", ""
        ));

        for listing in listings {
            lines.push(format!(
                "{:<part_width$}  {:>price_width$}  {:<grade_width$}  {:<vendor_width$}  {:<location_width$}  {}",
                truncate(&listing.part_name, part_width),
                truncate(&listing.price, price_width),
                truncate(&listing.grade, grade_width),
                truncate(&listing.vendor_name, vendor_width),
                truncate(&listing.location, location_width),
                listing.distance_miles
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} listings", listings.len()));

        lines.join("\n")
    }

    fn table_summaries(&self, summaries: &[PriceSummary]) -> String {
        let part_width = 30;
        let price_width = 10;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<part_width$}  {:>price_width$}  {:>price_width$}  {}",
            "Part", "Avg", "Low", "Listings"
        ));
        lines.push(format!(
            "{:-<part_width$}  {:-<price_width$}  {:-<price_width$}  {:-<8}",
            "", "", "", ""
        ));

        for summary in summaries {
            let (avg, low) = if summary.has_listings() {
                (format_price(summary.average_price), format_price(summary.low_price))
            } else {
                ("N/A".to_string(), "N/A".to_string())
            };

            lines.push(format!(
                "{:<part_width$}  {:>price_width$}  {:>price_width$}  {}",
                truncate(&summary.part_name, part_width),
                avg,
                low,
                summary.listing_count
            ));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_summaries(&self, summaries: &[PriceSummary]) -> String {
        let mut lines = vec![SUMMARY_CSV_HEADER.to_string()];

        for summary in summaries {
            let avg = summary.average_price.map(|p| format!("{:.2}", p)).unwrap_or_default();
            let low = summary.low_price.map(|p| format!("{:.2}", p)).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{}",
                csv_escape(&summary.part_name),
                avg,
                low,
                summary.listing_count
            ));
        }

        lines.join("\n")
    }
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Renders a price as "$1234.50", or an empty string when absent.
pub fn format_price(price: Option<f64>) -> String {
    price.map(|p| format!("${:.2}", p)).unwrap_or_default()
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
