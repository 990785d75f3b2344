//! VIN command: decode each VIN, search its parts, export the combined rows.

use crate::carpart::search::parts_or_default;
use crate::carpart::{CarPartClient, Listing, PartsMarket, SearchSession};
use crate::config::Config;
use crate::export::{self, vehicle_listing_record, Record, PARTS_PREFIX};
use crate::vin::{normalize_vin, validate_vin};
use crate::vinmatch::{VehicleDecoder, VinMatchClient};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Decodes VINs and prices their parts.
pub struct VinCommand {
    config: Config,
    parts: Vec<String>,
}

impl VinCommand {
    /// Creates a new VIN command searching `parts`, or the default catalog when empty.
    pub fn new(config: Config, parts: Vec<String>) -> Self {
        Self { config, parts }
    }

    /// Executes the full decode, search and export run.
    pub async fn execute(&self, vins: &[String]) -> Result<String> {
        self.config.require_zip()?;
        self.config.decoder_credentials()?;
        let vins = valid_vins(vins)?;

        let decoder =
            VinMatchClient::connect(&self.config).await.context("Failed to sign in to VINMatchPro")?;
        let market = CarPartClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with(&decoder, &market, &vins).await
    }

    /// Executes the run with provided collaborators (for testing).
    pub async fn execute_with(
        &self,
        decoder: &impl VehicleDecoder,
        market: &impl PartsMarket,
        vins: &[String],
    ) -> Result<String> {
        let records = self.collect_records(decoder, market, vins).await?;

        let saved = export::export(
            &records,
            self.config.output.format,
            &self.config.output.directory,
            PARTS_PREFIX,
        )?;

        let mut output = format!("Processed {} VIN(s), {} total row(s).", vins.len(), records.len());
        if let Some(path) = saved {
            output.push_str(&format!("\nSaved to {}", path.display()));
        }
        Ok(output)
    }

    /// Builds one row per listing, or a placeholder row per VIN without listings.
    ///
    /// VINs that fail to decode contribute no rows.
    pub async fn collect_records(
        &self,
        decoder: &impl VehicleDecoder,
        market: &impl PartsMarket,
        vins: &[String],
    ) -> Result<Vec<Record>> {
        let zip_code = self.config.require_zip()?;
        let parts = parts_or_default(&self.parts);
        let session = SearchSession::bootstrap(market).await?;
        let mut records = Vec::new();

        for vin in vins {
            info!("Processing VIN: {}", vin);

            let vehicle = match decoder.decode(vin).await {
                Ok(vehicle) => vehicle,
                Err(e) => {
                    warn!("Failed to decode VIN {}: {:#}", vin, e);
                    continue;
                }
            };
            info!("Vehicle: {}", vehicle.title());

            let listings = session
                .search_parts(vehicle.year(), vehicle.make(), vehicle.model(), zip_code, &parts)
                .await;
            info!("Found {} part listing(s) for {}", listings.len(), vin);

            if listings.is_empty() {
                records.push(vehicle_listing_record(&vehicle, &Listing::default()));
            } else {
                records.extend(listings.iter().map(|l| vehicle_listing_record(&vehicle, l)));
            }
        }

        Ok(records)
    }
}

/// Normalizes VINs and drops malformed ones; fails if none remain.
pub fn valid_vins(vins: &[String]) -> Result<Vec<String>> {
    let valid: Vec<String> = vins
        .iter()
        .filter(|vin| {
            let ok = validate_vin(vin);
            if !ok {
                warn!("\"{}\" does not look like a valid VIN. Skipping.", vin);
            }
            ok
        })
        .map(|vin| normalize_vin(vin))
        .collect();

    if valid.is_empty() {
        anyhow::bail!("No valid VINs to process");
    }
    Ok(valid)
}
