//! parts-pricer - Decode VINs and price used auto parts from Car-Part.com
//!
//! VINs are decoded through the VINMatchPro portal, comparable listings are
//! scraped from Car-Part.com with TLS fingerprint emulation, and the combined
//! rows are exported to CSV or Excel.

pub mod carpart;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod vin;
pub mod vinmatch;

pub use carpart::{Listing, PriceSummary, SearchSession};
pub use config::Config;
pub use error::{ConfigError, DecodeError};
pub use vinmatch::VehicleAttributes;
