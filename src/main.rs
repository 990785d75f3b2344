//! parts-pricer - Decode VINs and price used auto parts from Car-Part.com
//!
//! Decodes vehicles through VINMatchPro and collects comparable marketplace listings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parts_pricer::carpart::DEFAULT_PARTS;
use parts_pricer::commands::{PriceCommand, SearchCommand, VinCommand};
use parts_pricer::config::{Config, ExportFormat, OutputFormat};
use parts_pricer::format::Formatter;
use parts_pricer::vin::{normalize_vin, validate_vin};
use parts_pricer::vinmatch::{VehicleAttributes, VehicleDecoder, VinMatchClient};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "parts-pricer",
    version,
    about = "Decode VINs and price used auto parts from Car-Part.com",
    long_about = "Decodes VINs through VINMatchPro, searches Car-Part.com for comparable used parts, and exports listings and suggested prices to CSV or Excel."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Zip code to search from
    #[arg(long, global = true, env = "PARTS_ZIP")]
    zip: Option<String>,

    /// Stdout format (table, json, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Export file format (csv, excel)
    #[arg(long, global = true)]
    export_format: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PARTS_PROXY")]
    proxy: Option<String>,

    /// Delay between searches in milliseconds
    #[arg(long, global = true, env = "PARTS_DELAY")]
    delay: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings for a year/make/model
    #[command(alias = "s")]
    Search {
        /// Model year
        year: String,

        /// Manufacturer, e.g. "Mercedes-Benz"
        make: String,

        /// Model, e.g. "C300"
        model: String,

        /// Part to search (repeatable; defaults to the standard part list)
        #[arg(short, long = "part")]
        parts: Vec<String>,

        /// Also export the listings
        #[arg(short, long)]
        export: bool,
    },

    /// Decode VINs, search their parts and export the combined rows
    #[command(alias = "v")]
    Vin {
        /// VIN(s) to process
        #[arg(required = true)]
        vins: Vec<String>,

        /// Part to search (repeatable; defaults to the standard part list)
        #[arg(short, long = "part")]
        parts: Vec<String>,
    },

    /// Suggest prices for un-priced parts and export a report
    #[command(alias = "p")]
    Price {
        /// VIN of the vehicle; decoded when year/make/model are not given
        #[arg(long)]
        vin: Option<String>,

        /// Model year
        #[arg(long, requires_all = ["make", "model"])]
        year: Option<String>,

        /// Manufacturer
        #[arg(long, requires_all = ["year", "model"])]
        make: Option<String>,

        /// Model
        #[arg(long, requires_all = ["year", "make"])]
        model: Option<String>,

        /// Part categories to price
        #[arg(required = true)]
        parts: Vec<String>,
    },

    /// Decode a single VIN and print the vehicle
    #[command(alias = "d")]
    Decode {
        /// VIN to decode
        vin: String,
    },

    /// List the default part searches
    Parts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(zip) = cli.zip {
        config.carpart.zip_code = Some(zip);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(export_format) = cli.export_format {
        config.output.format = export_format;
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.carpart.delay_ms = delay;
    }

    match cli.command {
        Commands::Search { year, make, model, parts, export } => {
            let cmd = SearchCommand::new(config).with_export(export);
            let output = cmd.execute(&year, &make, &model, &parts).await?;
            println!("{}", output);
        }

        Commands::Vin { vins, parts } => {
            let cmd = VinCommand::new(config, parts);
            let output = cmd.execute(&vins).await?;
            println!("{}", output);
        }

        Commands::Price { vin, year, make, model, parts } => {
            let vehicle = match (year, make, model) {
                (Some(year), Some(make), Some(model)) => {
                    let mut vehicle = VehicleAttributes::from_ymm(&year, &make, &model);
                    vehicle.vin = vin.map(|v| normalize_vin(&v)).unwrap_or_default();
                    vehicle
                }
                _ => {
                    let vin = vin.context("Either --vin or --year/--make/--model is required")?;
                    config.require_zip()?;
                    decode_vin(&config, &vin).await?
                }
            };

            let cmd = PriceCommand::new(config, vehicle);
            let output = cmd.execute(&parts).await?;
            println!("{}", output);
        }

        Commands::Decode { vin } => {
            let vehicle = decode_vin(&config, &vin).await?;
            println!("{}", Formatter::new(config.format).format_vehicle(&vehicle));
        }

        Commands::Parts => {
            println!("Default part searches:\n");
            for part in DEFAULT_PARTS {
                println!("  {}", part);
            }
        }
    }

    Ok(())
}

async fn decode_vin(config: &Config, vin: &str) -> Result<VehicleAttributes> {
    if !validate_vin(vin) {
        anyhow::bail!("\"{}\" does not look like a valid VIN", vin);
    }
    let client =
        VinMatchClient::connect(config).await.context("Failed to sign in to VINMatchPro")?;
    client.decode(&normalize_vin(vin)).await
}
