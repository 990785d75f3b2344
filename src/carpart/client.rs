//! HTTP client for Car-Part.com using wreq for TLS fingerprint emulation.

use super::models::FormData;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Path of the marketplace's search form handler.
pub const SEARCH_PATH: &str = "/cgi-bin/search.cgi";

/// Trait for marketplace requests - enables stub sessions in tests.
#[async_trait]
pub trait PartsMarket: Send + Sync {
    /// Fetches the home page carrying the search form.
    async fn home_page(&self) -> Result<String>;

    /// Submits the search form and returns the response HTML.
    async fn submit_search(&self, form: &FormData) -> Result<String>;
}

/// Car-Part.com HTTP client with a cookie jar shared across a batch.
pub struct CarPartClient {
    client: Client,
    base_url: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl CarPartClient {
    /// Creates a client for the configured marketplace URL.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, config.carpart.base_url.clone())
    }

    /// Creates a client against a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.carpart.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay_ms: config.carpart.delay_ms,
            delay_jitter_ms: config.carpart.delay_jitter_ms,
        })
    }

    /// Adds a random delay between submissions.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }

    async fn read_body(response: wreq::Response) -> Result<String> {
        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Car-Part.com returned 503; it may be throttling this client.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl PartsMarket for CarPartClient {
    async fn home_page(&self) -> Result<String> {
        let url = format!("{}/", self.base_url);
        info!("Opening Car-Part.com session");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_body(response).await
    }

    async fn submit_search(&self, form: &FormData) -> Result<String> {
        self.delay().await;

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        debug!("POST {} ({} fields)", url, form.len());

        let response = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Origin", self.base_url.as_str())
            .header("Referer", format!("{}/", self.base_url))
            .body(form.encode())
            .send()
            .await
            .context("Failed to send search")?;

        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        let mut config = Config::new();
        config.carpart.delay_ms = 0;
        config.carpart.delay_jitter_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_home_page_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<form><input type="hidden" name="t" value="1"></form>"#),
            )
            .mount(&mock_server)
            .await;

        let client = CarPartClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let body = client.home_page().await.unwrap();
        assert!(body.contains("hidden"));
    }

    #[tokio::test]
    async fn test_home_page_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = CarPartClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let err = client.home_page().await.unwrap_err().to_string();
        assert!(err.contains("500"));
    }

    #[tokio::test]
    async fn test_submit_search_posts_form() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("userPart=Fuel%20Tank"))
            .and(body_string_contains("userLocation=All%20States"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CarPartClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let form: FormData =
            [("userPart", "Fuel Tank"), ("userLocation", "All States")].into_iter().collect();

        let body = client.submit_search(&form).await.unwrap();
        assert!(body.contains("results"));
    }

    #[tokio::test]
    async fn test_submit_search_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = CarPartClient::with_base_url(&make_test_config(), mock_server.uri()).unwrap();
        let err = client.submit_search(&FormData::new()).await.unwrap_err().to_string();
        assert!(err.contains("503"));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let client =
            CarPartClient::with_base_url(&make_test_config(), "http://custom.url/".to_string())
                .unwrap();
        assert_eq!(client.base_url, "http://custom.url");
    }

    #[tokio::test]
    async fn test_default_base_url() {
        let client = CarPartClient::new(&make_test_config()).unwrap();
        assert_eq!(client.base_url, "https://www.car-part.com");
    }
}
