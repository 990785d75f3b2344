//! Result export to CSV or Excel workbooks.

use crate::carpart::Listing;
use crate::config::ExportFormat;
use crate::format::csv_escape;
use crate::vinmatch::VehicleAttributes;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Worksheet name used for Excel exports.
pub const SHEET_NAME: &str = "Parts Results";

/// File prefix for VIN and year/make/model exports.
pub const PARTS_PREFIX: &str = "parts";

/// File prefix for the suggested-price report.
pub const UNPRICED_PREFIX: &str = "unpriced";

/// One output row: ordered column/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, or replaces its value if already present.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&Listing> for Record {
    fn from(listing: &Listing) -> Self {
        Record::new()
            .with("part_name", &listing.part_name)
            .with("year", &listing.year)
            .with("description", &listing.description)
            .with("grade", &listing.grade)
            .with("stock_number", &listing.stock_number)
            .with("price", &listing.price)
            .with("vendor", &listing.vendor_name)
            .with("location", &listing.location)
            .with("phone", &listing.phone)
            .with("distance_miles", &listing.distance_miles)
    }
}

impl From<&VehicleAttributes> for Record {
    fn from(vehicle: &VehicleAttributes) -> Self {
        Record::new()
            .with("vin", &vehicle.vin)
            .with("year", vehicle.year())
            .with("make", vehicle.make())
            .with("model", vehicle.model())
            .with("trim", vehicle.trim())
            .with("engine", vehicle.engine())
    }
}

/// Vehicle columns followed by one listing's columns.
///
/// The listing's model year replaces the vehicle's when both are present.
pub fn vehicle_listing_record(vehicle: &VehicleAttributes, listing: &Listing) -> Record {
    let mut record = Record::from(vehicle);
    for (key, value) in Record::from(listing).fields {
        if key == "year" && value.is_empty() {
            continue;
        }
        record.set(key, value);
    }
    record
}

/// Column names taken from the first record.
fn header(records: &[Record]) -> Vec<&str> {
    records.first().map(|r| r.keys().collect()).unwrap_or_default()
}

/// Renders records as CSV text; missing columns are written empty.
pub fn to_csv(records: &[Record]) -> String {
    let columns = header(records);
    let mut lines = Vec::with_capacity(records.len() + 1);

    lines.push(columns.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));
    for record in records {
        let row: Vec<String> =
            columns.iter().map(|c| csv_escape(record.get(c).unwrap_or(""))).collect();
        lines.push(row.join(","));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Writes records to a CSV file.
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    fs::write(path, to_csv(records))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))
}

/// Writes records to a single-sheet Excel workbook with a bold header row.
pub fn write_xlsx(records: &[Record], path: &Path) -> Result<()> {
    let columns = header(records);
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, name) in columns.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, record.get(name).unwrap_or(""))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write Excel file: {}", path.display()))
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_file_name(prefix: &str, format: ExportFormat, timestamp: &str) -> String {
    format!("{}_{}.{}", prefix, timestamp, format.extension())
}

/// Writes records into `dir` with a timestamped name.
///
/// Returns the written path, or `None` when there was nothing to export.
pub fn export(
    records: &[Record],
    format: ExportFormat,
    dir: &Path,
    prefix: &str,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        warn!("No data to export.");
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = dir.join(export_file_name(prefix, format, &timestamp));

    match format {
        ExportFormat::Csv => write_csv(records, &path)?,
        ExportFormat::Excel => write_xlsx(records, &path)?,
    }

    info!("Saved {} row(s) to {}", records.len(), path.display());
    Ok(Some(path))
}
