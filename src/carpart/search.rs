//! Part searches against a bootstrapped marketplace session.

use super::client::PartsMarket;
use super::columns::{HeaderDictionary, TableClassifier};
use super::models::{FormData, Listing, PartOutcome, PriceSummary, SearchCriteria};
use super::normalize::model_search_term;
use super::parser::{self, SearchPage};
use super::stats;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Collision-repair categories searched when no part list is given.
pub const DEFAULT_PARTS: &[&str] = &[
    "Engine",
    "Transmission",
    "Hood",
    "Fender",
    "Headlight Assembly",
    "Tail Light",
    "Radiator",
    "Front Bumper Assembly (includes cover)",
    "Rear Bumper Assembly (includes cover)",
    "Front Door (see also Door Shell, Front)",
    "A/C Compressor",
];

/// Form field carrying the chosen interchange group on the second submission.
const INTERCHANGE_FIELD: &str = "userInterchange";

/// A marketplace session: one client, its cookies, and the home page's hidden fields.
///
/// Searches run one after another through the same session; bootstrap once per batch.
pub struct SearchSession<'a, M: PartsMarket + ?Sized, C: TableClassifier = HeaderDictionary> {
    market: &'a M,
    hidden_fields: FormData,
    classifier: C,
}

impl<'a, M: PartsMarket + ?Sized> SearchSession<'a, M> {
    /// Fetches the home page and captures its hidden form fields.
    ///
    /// Failure here aborts the whole batch.
    pub async fn bootstrap(market: &'a M) -> Result<Self> {
        let html = market.home_page().await.context("Failed to open Car-Part.com session")?;
        let hidden_fields = parser::parse_hidden_fields(&html);
        debug!("Session bootstrapped with {} hidden fields", hidden_fields.len());

        Ok(Self::with_hidden_fields(market, hidden_fields))
    }

    /// Builds a session from already-known hidden fields.
    pub fn with_hidden_fields(market: &'a M, hidden_fields: FormData) -> Self {
        Self { market, hidden_fields, classifier: HeaderDictionary::default() }
    }
}

impl<'a, M: PartsMarket + ?Sized, C: TableClassifier> SearchSession<'a, M, C> {
    /// Swaps the header classifier used for results tables.
    pub fn with_classifier<C2: TableClassifier>(self, classifier: C2) -> SearchSession<'a, M, C2> {
        SearchSession { market: self.market, hidden_fields: self.hidden_fields, classifier }
    }

    pub fn hidden_fields(&self) -> &FormData {
        &self.hidden_fields
    }

    /// Builds the initial submission for one part.
    pub fn search_form(&self, criteria: &SearchCriteria) -> FormData {
        let mut form = FormData::new();
        form.set("userDate", criteria.year.trim());
        form.set("userModel", model_search_term(&criteria.make, &criteria.model));
        form.set("userPart", criteria.part_name.trim());
        form.set("userLocation", "All States");
        form.set("userPreference", "zip");
        form.set("userZip", criteria.zip_code.trim());
        form.merge(&self.hidden_fields);
        form
    }

    /// Runs one part search, following a single interchange step if offered.
    pub async fn search_part(&self, criteria: &SearchCriteria) -> PartOutcome {
        let part_name = criteria.part_name.as_str();
        let form = self.search_form(criteria);

        let html = match self.market.submit_search(&form).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Search failed for \"{}\": {:#}", part_name, e);
                return PartOutcome::TransportFailed(format!("{:#}", e));
            }
        };

        match parser::parse_search_page(&html, part_name, &self.classifier) {
            SearchPage::Invalid => PartOutcome::Invalid,
            SearchPage::Results(listings) => PartOutcome::Listings(listings),
            SearchPage::Interchange { choice, hidden } => {
                let mut follow_up = form;
                follow_up.merge(&hidden);
                follow_up.set(INTERCHANGE_FIELD, choice);

                match self.market.submit_search(&follow_up).await {
                    Ok(html) => PartOutcome::Listings(parser::parse_results_page(
                        &html,
                        part_name,
                        &self.classifier,
                    )),
                    Err(e) => {
                        warn!("Interchange search failed for \"{}\": {:#}", part_name, e);
                        PartOutcome::TransportFailed(format!("{:#}", e))
                    }
                }
            }
        }
    }

    /// Searches every part in turn and returns all listings in search order.
    pub async fn search_parts(
        &self,
        year: &str,
        make: &str,
        model: &str,
        zip_code: &str,
        parts: &[String],
    ) -> Vec<Listing> {
        let mut all_listings = Vec::new();

        for part_name in parts {
            let criteria = SearchCriteria::new(part_name.as_str(), year, make, model, zip_code);
            let outcome = self.search_part(&criteria).await;
            match &outcome {
                PartOutcome::Listings(listings) => {
                    info!("{}: {} listing(s)", part_name, listings.len());
                }
                PartOutcome::Invalid => info!("{}: not offered for this vehicle", part_name),
                PartOutcome::TransportFailed(_) => {}
            }
            all_listings.extend(outcome.into_listings());
        }

        all_listings
    }

    /// Searches one part and summarizes its deduplicated listings.
    pub async fn search_single_part(
        &self,
        part_name: &str,
        year: &str,
        make: &str,
        model: &str,
        zip_code: &str,
    ) -> PriceSummary {
        let criteria = SearchCriteria::new(part_name, year, make, model, zip_code);
        let listings = self.search_part(&criteria).await.into_listings();
        stats::summarize(part_name, listings)
    }
}

/// Resolves an optional part list to the default catalog.
pub fn parts_or_default(parts: &[String]) -> Vec<String> {
    if parts.is_empty() {
        DEFAULT_PARTS.iter().map(|p| p.to_string()).collect()
    } else {
        parts.to_vec()
    }
}
