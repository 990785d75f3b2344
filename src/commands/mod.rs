//! CLI command implementations.

pub mod price;
pub mod search;
pub mod vin;

#[cfg(test)]
mod mocks;

pub use price::PriceCommand;
pub use search::SearchCommand;
pub use vin::VinCommand;
