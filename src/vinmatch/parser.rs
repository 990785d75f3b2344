//! Parser for VINMatchPro decode pages.

use super::models::VehicleAttributes;
use crate::error::DecodeError;
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

mod selectors {
    use super::*;

    pub static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\s+(\S+)\s+(.+)$").unwrap());

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Style:\s*(.+)").unwrap());

/// Labelled values that may sit on the label's line or the next one.
static FIELD_RES: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
    [
        (Field::BodyStyle, r"Body Type:\s*(.+)"),
        (Field::DriveType, r"Drive Type:\s*(.+)"),
        (Field::FuelType, r"Fuel Type:\s*(.+)"),
        (Field::FuelEconomy, r"Fuel Economy \(City/Highway/Combined\):\s*(.+)"),
        (Field::FuelTank, r"Fuel Tank Capacity:\s*(.+)"),
        (Field::EngineCylinders, r"Engine Cylinders:\s*(\d+)"),
        (Field::ExteriorColor, r"Exterior Color:\s*(.+)"),
        (Field::InteriorColor, r"Interior Color:\s*(.+)"),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).unwrap()))
    .collect()
});

/// Placeholder the portal renders next to copyable values.
const COPY_LABEL: &str = "Copy";

const MIN_YEAR: u32 = 1900;
const MAX_YEAR: u32 = 2030;

#[derive(Debug, Clone, Copy)]
enum Field {
    BodyStyle,
    DriveType,
    FuelType,
    FuelEconomy,
    FuelTank,
    EngineCylinders,
    ExteriorColor,
    InteriorColor,
}

impl Field {
    fn slot(self, vehicle: &mut VehicleAttributes) -> &mut Option<String> {
        match self {
            Field::BodyStyle => &mut vehicle.body_style,
            Field::DriveType => &mut vehicle.drive_type,
            Field::FuelType => &mut vehicle.fuel_type,
            Field::FuelEconomy => &mut vehicle.fuel_economy,
            Field::FuelTank => &mut vehicle.fuel_tank,
            Field::EngineCylinders => &mut vehicle.engine_cylinders,
            Field::ExteriorColor => &mut vehicle.exterior_color,
            Field::InteriorColor => &mut vehicle.interior_color,
        }
    }
}

/// Parses a decode page's HTML into vehicle attributes.
pub fn parse_decode_page(html: &str, vin: &str) -> Result<VehicleAttributes, DecodeError> {
    parse_decode_text(&page_text(html), vin)
}

/// Parses the visible text of a decode page, one text block per line.
pub fn parse_decode_text(text: &str, vin: &str) -> Result<VehicleAttributes, DecodeError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut vehicle = VehicleAttributes::new(vin);

    for line in &lines {
        let Some(caps) = TITLE_RE.captures(line) else {
            continue;
        };
        let year: u32 = caps[1].parse().unwrap_or(0);
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            vehicle.year = Some(caps[1].to_string());
            vehicle.make = Some(caps[2].to_string());
            vehicle.model = Some(caps[3].trim().to_string());
            break;
        }
    }

    if let Some(caps) = STYLE_RE.captures(text) {
        vehicle.trim = Some(caps[1].trim().to_string());
    }

    for (field, re) in FIELD_RES.iter() {
        if let Some(value) = re.captures(text).map(|c| c[1].trim().to_string()) {
            if !value.is_empty() && value != COPY_LABEL {
                *field.slot(&mut vehicle) = Some(value);
            }
        }
    }

    vehicle.engine = value_after_label(&lines, "Engine:");
    vehicle.transmission = value_after_label(&lines, "Transmission:");
    vehicle.axle_ratio = value_after_label(&lines, "Axle Ratio:");

    if vehicle.year.is_none() {
        return Err(DecodeError::MissingYear { vin: vin.to_string() });
    }

    debug!("Decoded {}: {}", vin, vehicle.title());
    Ok(vehicle)
}

/// Value on the line following a standalone label line.
fn value_after_label(lines: &[&str], label: &str) -> Option<String> {
    let pos = lines.iter().position(|l| *l == label)?;
    lines
        .get(pos + 1)
        .filter(|v| !v.is_empty() && **v != COPY_LABEL)
        .map(|v| v.to_string())
}

/// Visible text of the page body, one trimmed text node per line.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document.select(&selectors::BODY).next().unwrap_or_else(|| document.root_element());

    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if matches!(parent.value().name(), "script" | "style" | "noscript") {
                return None;
            }
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
