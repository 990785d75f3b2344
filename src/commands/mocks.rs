//! Mock marketplace and decoder shared by the command tests.

use crate::carpart::{FormData, PartsMarket};
use crate::vinmatch::{VehicleAttributes, VehicleDecoder};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const HOME_HTML: &str = r#"
    <html><body><form action="/cgi-bin/search.cgi" method="post">
        <input type="hidden" name="userSearch" value="int">
    </form></body></html>
"#;

/// Builds a results page with one row per `(description, stock, price, dealer)`.
pub fn results_html(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut html = String::from(
        r#"<html><body><table>
            <tr><th>YearPartModel</th><th>Description</th><th>Damage</th><th>PartGrade</th>
                <th>Stock#</th><th>USPrice</th><th>Dealer Info</th><th>Distmile</th></tr>"#,
    );
    for (description, stock, price, dealer) in rows {
        html.push_str(&format!(
            "<tr><td>2017PartAudi A6</td><td>{}</td><td></td><td>A</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>10</td></tr>",
            description, stock, price, dealer
        ));
    }
    html.push_str("</table></body></html>");
    html
}

/// Marketplace answering each search by its `userPart` field.
///
/// Parts without a canned page fail in transit.
pub struct MockMarket {
    pages: HashMap<String, String>,
    home_fails: bool,
    submissions: Arc<AtomicU32>,
}

impl MockMarket {
    pub fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages.iter().map(|(p, html)| (p.to_string(), html.clone())).collect(),
            home_fails: false,
            submissions: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn unreachable() -> Self {
        Self { home_fails: true, ..Self::new(&[]) }
    }

    pub fn submission_count(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PartsMarket for MockMarket {
    async fn home_page(&self) -> Result<String> {
        if self.home_fails {
            anyhow::bail!("connection refused");
        }
        Ok(HOME_HTML.to_string())
    }

    async fn submit_search(&self, form: &FormData) -> Result<String> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let part = form.get("userPart").unwrap_or_default();
        match self.pages.get(part) {
            Some(html) => Ok(html.clone()),
            None => anyhow::bail!("connection reset while searching {}", part),
        }
    }
}

/// Decoder with fixed answers; unknown VINs fail to decode.
pub struct MockDecoder {
    vehicles: HashMap<String, VehicleAttributes>,
}

impl MockDecoder {
    pub fn new(vehicles: Vec<VehicleAttributes>) -> Self {
        Self { vehicles: vehicles.into_iter().map(|v| (v.vin.clone(), v)).collect() }
    }
}

#[async_trait]
impl VehicleDecoder for MockDecoder {
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes> {
        match self.vehicles.get(vin) {
            Some(vehicle) => Ok(vehicle.clone()),
            None => Err(crate::error::DecodeError::MissingYear { vin: vin.to_string() }.into()),
        }
    }
}

pub fn vehicle(vin: &str, year: &str, make: &str, model: &str) -> VehicleAttributes {
    VehicleAttributes { vin: vin.to_string(), ..VehicleAttributes::from_ymm(year, make, model) }
}
