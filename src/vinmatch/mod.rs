//! VINMatchPro decode portal: login, decode page fetch and parsing.

pub mod client;
pub mod models;
pub mod parser;

pub use client::{VehicleDecoder, VinMatchClient};
pub use models::VehicleAttributes;
