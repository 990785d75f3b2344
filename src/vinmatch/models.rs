//! Decoded vehicle data.

use serde::{Deserialize, Serialize};

/// Vehicle attributes read from a VINMatchPro decode page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    pub vin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Style line, e.g. "4dr SR5 3.4L Auto 4WD"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_economy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_tank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_cylinders: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exterior_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axle_ratio: Option<String>,
}

impl VehicleAttributes {
    pub fn new(vin: impl Into<String>) -> Self {
        Self { vin: vin.into(), ..Default::default() }
    }

    /// Builds attributes from a known year/make/model without decoding.
    pub fn from_ymm(year: &str, make: &str, model: &str) -> Self {
        Self {
            year: Some(year.to_string()),
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            ..Default::default()
        }
    }

    pub fn year(&self) -> &str {
        self.year.as_deref().unwrap_or("")
    }

    pub fn make(&self) -> &str {
        self.make.as_deref().unwrap_or("")
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("")
    }

    pub fn trim(&self) -> &str {
        self.trim.as_deref().unwrap_or("")
    }

    pub fn engine(&self) -> &str {
        self.engine.as_deref().unwrap_or("")
    }

    /// "1999 Toyota 4Runner", with "?" for missing parts.
    pub fn title(&self) -> String {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".to_string());
        format!("{} {} {}", or_unknown(&self.year), or_unknown(&self.make), or_unknown(&self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_default_to_empty() {
        let vehicle = VehicleAttributes::new("JT3HN86R0X0197825");
        assert_eq!(vehicle.vin, "JT3HN86R0X0197825");
        assert_eq!(vehicle.year(), "");
        assert_eq!(vehicle.engine(), "");
        assert_eq!(vehicle.title(), "? ? ?");
    }

    #[test]
    fn test_from_ymm() {
        let vehicle = VehicleAttributes::from_ymm("2017", "Audi", "A6");
        assert_eq!(vehicle.title(), "2017 Audi A6");
        assert!(vehicle.vin.is_empty());
    }

    #[test]
    fn test_serde_skips_missing_fields() {
        let mut vehicle = VehicleAttributes::new("VIN");
        vehicle.year = Some("1999".to_string());
        let json = serde_json::to_string(&vehicle).unwrap();
        assert_eq!(json, r#"{"vin":"VIN","year":"1999"}"#);
    }
}
