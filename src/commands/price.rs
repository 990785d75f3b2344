//! Price command: suggested prices for a list of raw part categories.

use crate::carpart::{CarPartClient, PartsMarket, PriceSummary, SearchSession};
use crate::config::Config;
use crate::export::{self, Record, UNPRICED_PREFIX};
use crate::format::{format_price, Formatter};
use crate::vin::clean_search_term;
use crate::vinmatch::VehicleAttributes;
use anyhow::{Context, Result};
use tracing::info;

/// Note for parts whose category cleans down to nothing.
pub const NOTE_UNCLEAR: &str = "Description unclear – manual review";

/// Note for parts the marketplace had no listings for.
pub const NOTE_NO_LISTINGS: &str = "No Car-Part listings";

/// Fallback label length when a category is unusable as a search term.
const RAW_LABEL_CHARS: usize = 60;

/// One priced part and the row written for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedPart {
    pub summary: PriceSummary,
    pub notes: &'static str,
}

/// Prices raw part categories for one vehicle.
pub struct PriceCommand {
    config: Config,
    vehicle: VehicleAttributes,
}

impl PriceCommand {
    /// Creates a command for the given vehicle; its VIN may be empty.
    pub fn new(config: Config, vehicle: VehicleAttributes) -> Self {
        Self { config, vehicle }
    }

    /// Executes the pricing run and returns formatted output.
    pub async fn execute(&self, parts: &[String]) -> Result<String> {
        self.config.require_zip()?;
        let client = CarPartClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_market(&client, parts).await
    }

    /// Executes the pricing run against a provided marketplace (for testing).
    pub async fn execute_with_market(
        &self,
        market: &impl PartsMarket,
        parts: &[String],
    ) -> Result<String> {
        if parts.is_empty() {
            anyhow::bail!("No parts to price");
        }

        let priced = self.price_parts(market, parts).await?;
        let records: Vec<Record> = priced.iter().map(|p| self.record(p)).collect();

        let saved = export::export(
            &records,
            self.config.output.format,
            &self.config.output.directory,
            UNPRICED_PREFIX,
        )?;

        let summaries: Vec<PriceSummary> = priced.into_iter().map(|p| p.summary).collect();
        let mut output = Formatter::new(self.config.format).format_summaries(&summaries);
        if let Some(path) = saved {
            output.push_str(&format!("\n\n{} part(s) written to {}", records.len(), path.display()));
        }
        Ok(output)
    }

    /// Searches each cleaned category and summarizes its listings.
    pub async fn price_parts(
        &self,
        market: &impl PartsMarket,
        parts: &[String],
    ) -> Result<Vec<PricedPart>> {
        let zip_code = self.config.require_zip()?;
        let session = SearchSession::bootstrap(market).await?;
        let mut priced = Vec::with_capacity(parts.len());

        for raw in parts {
            let term = clean_search_term(raw);

            if term.is_empty() {
                let label: String = raw.trim().chars().take(RAW_LABEL_CHARS).collect();
                info!("Skipping unclear part: {}", label);
                priced.push(PricedPart { summary: PriceSummary::empty(label), notes: NOTE_UNCLEAR });
                continue;
            }

            info!("Searching: {}", term);
            let summary = session
                .search_single_part(
                    &term,
                    self.vehicle.year(),
                    self.vehicle.make(),
                    self.vehicle.model(),
                    zip_code,
                )
                .await;

            if summary.has_listings() {
                info!(
                    "{}: avg={} low={} ({} listings)",
                    term,
                    format_price(summary.average_price),
                    format_price(summary.low_price),
                    summary.listing_count
                );
            } else {
                info!("{}: no listings found", term);
            }

            let notes = if summary.has_listings() { "" } else { NOTE_NO_LISTINGS };
            priced.push(PricedPart { summary, notes });
        }

        Ok(priced)
    }

    fn record(&self, priced: &PricedPart) -> Record {
        let summary = &priced.summary;
        let mut record = Record::new();
        if !self.vehicle.vin.is_empty() {
            record.set("vin", &self.vehicle.vin);
        }
        record
            .with("year", self.vehicle.year())
            .with("make", self.vehicle.make())
            .with("model", self.vehicle.model())
            .with("part_name", &summary.part_name)
            .with("avg_price", format_price(summary.average_price))
            .with("low_price", format_price(summary.low_price))
            .with("listing_count", summary.listing_count.to_string())
            .with("notes", priced.notes)
    }
}
