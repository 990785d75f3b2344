//! Car-Part.com modules for sessions, searches, parsing, and price statistics.

pub mod client;
pub mod columns;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod search;
pub mod selectors;
pub mod stats;

pub use client::{CarPartClient, PartsMarket};
pub use columns::{ColumnMap, HeaderDictionary, TableClassifier};
pub use models::{FormData, Listing, PartOutcome, PriceSummary, SearchCriteria};
pub use search::{SearchSession, DEFAULT_PARTS};
