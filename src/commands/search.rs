//! Search command implementation.

use crate::carpart::search::parts_or_default;
use crate::carpart::{CarPartClient, PartsMarket, SearchSession};
use crate::config::Config;
use crate::export::{self, Record, PARTS_PREFIX};
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Searches the marketplace for a known year/make/model.
pub struct SearchCommand {
    config: Config,
    export: bool,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config, export: false }
    }

    /// Also writes the listings to the configured output directory.
    pub fn with_export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(
        &self,
        year: &str,
        make: &str,
        model: &str,
        parts: &[String],
    ) -> Result<String> {
        self.config.require_zip()?;
        let client = CarPartClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_market(&client, year, make, model, parts).await
    }

    /// Executes the search against a provided marketplace (for testing).
    pub async fn execute_with_market(
        &self,
        market: &impl PartsMarket,
        year: &str,
        make: &str,
        model: &str,
        parts: &[String],
    ) -> Result<String> {
        let zip_code = self.config.require_zip()?;
        let parts = parts_or_default(parts);
        info!("Searching {} part(s) for {} {} {}", parts.len(), year, make, model);

        let session = SearchSession::bootstrap(market).await?;
        let listings = session.search_parts(year, make, model, zip_code, &parts).await;
        info!("Found {} listing(s)", listings.len());

        let formatter = Formatter::new(self.config.format);
        let mut output = formatter.format_listings(&listings);

        if self.export {
            let records: Vec<Record> = listings.iter().map(Record::from).collect();
            if let Some(path) = export::export(
                &records,
                self.config.output.format,
                &self.config.output.directory,
                PARTS_PREFIX,
            )? {
                output.push_str(&format!("\n\nSaved to {}", path.display()));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mocks::{results_html, MockMarket};
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn make_test_config() -> Config {
        let mut config = Config::new();
        config.carpart.zip_code = Some("80202".to_string());
        config.carpart.delay_ms = 0;
        config.carpart.delay_jitter_ms = 0;
        config
    }

    fn parts(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_search_command_basic() {
        let market = MockMarket::new(&[(
            "Hood",
            results_html(&[
                ("silver", "S1", "$100actual", "ABC Auto USA-NY(Buffalo) 716-555-0100"),
                ("black", "S2", "$150actual", "XYZ Parts USA-PA(Erie) 814-555-0100"),
            ]),
        )]);

        let cmd = SearchCommand::new(make_test_config());
        let output = cmd
            .execute_with_market(&market, "2017", "Audi", "A6", &parts(&["Hood"]))
            .await
            .unwrap();

        assert!(output.contains("ABC Auto"));
        assert!(output.contains("XYZ Parts"));
        assert!(output.contains("Total: 2 listings"));
    }

    #[tokio::test]
    async fn test_search_command_failed_part_continues() {
        let market = MockMarket::new(&[(
            "Hood",
            results_html(&[("silver", "S1", "$100", "ABC Auto USA-NY(Buffalo) 716-555-0100")]),
        )]);

        let cmd = SearchCommand::new(make_test_config());
        let output = cmd
            .execute_with_market(&market, "2017", "Audi", "A6", &parts(&["Engine", "Hood"]))
            .await
            .unwrap();

        assert_eq!(market.submission_count(), 2);
        assert!(output.contains("Total: 1 listings"));
    }

    #[tokio::test]
    async fn test_search_command_default_parts() {
        let market = MockMarket::new(&[]);
        let cmd = SearchCommand::new(make_test_config());

        let output = cmd.execute_with_market(&market, "2017", "Audi", "A6", &[]).await.unwrap();

        assert_eq!(market.submission_count() as usize, crate::carpart::DEFAULT_PARTS.len());
        assert!(output.contains("No listings found"));
    }

    #[tokio::test]
    async fn test_search_command_bootstrap_failure() {
        let market = MockMarket::unreachable();
        let cmd = SearchCommand::new(make_test_config());

        let result = cmd.execute_with_market(&market, "2017", "Audi", "A6", &[]).await;
        assert!(result.is_err());
        assert_eq!(market.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_search_command_requires_zip() {
        let market = MockMarket::new(&[]);
        let mut config = make_test_config();
        config.carpart.zip_code = None;

        let err = SearchCommand::new(config)
            .execute_with_market(&market, "2017", "Audi", "A6", &[])
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<crate::error::ConfigError>().is_some());
        assert_eq!(market.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_search_command_json_and_export() {
        let dir = TempDir::new().unwrap();
        let market = MockMarket::new(&[(
            "Hood",
            results_html(&[("silver", "S1", "$100", "ABC Auto USA-NY(Buffalo) 716-555-0100")]),
        )]);

        let mut config = make_test_config();
        config.format = OutputFormat::Json;
        config.output.directory = dir.path().to_path_buf();

        let output = SearchCommand::new(config)
            .with_export(true)
            .execute_with_market(&market, "2017", "Audi", "A6", &parts(&["Hood"]))
            .await
            .unwrap();

        assert!(output.starts_with('['));
        assert!(output.contains("Saved to"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
