//! Typed errors for the failures callers need to tell apart.

use thiserror::Error;

/// Settings missing before any network activity can start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no zip code configured; set [carpart] zip_code, PARTS_ZIP or --zip")]
    MissingZip,

    #[error("VINMatchPro {field} not configured; set [vinmatch] {field} or VINMATCH_{env}")]
    MissingDecoderSetting { field: &'static str, env: &'static str },
}

/// The decode portal did not yield usable vehicle data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "failed to parse VIN decode results for {vin}; the page may not have loaded correctly"
    )]
    MissingYear { vin: String },

    #[error("VINMatchPro login was rejected for {username}")]
    LoginRejected { username: String },
}
