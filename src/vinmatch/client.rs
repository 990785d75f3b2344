//! HTTP client for the VINMatchPro decode portal.

use super::models::VehicleAttributes;
use super::parser::parse_decode_page;
use crate::carpart::parser::parse_hidden_fields;
use crate::config::Config;
use crate::error::DecodeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

const SIGN_IN_PATH: &str = "/users/sign_in";
const DECODE_PATH: &str = "/decode";

/// Present on the sign-in page only; its return after a login POST means rejection.
const PASSWORD_FIELD: &str = "user[password]";

/// Trait for VIN decoding - enables stub decoders in tests.
#[async_trait]
pub trait VehicleDecoder: Send + Sync {
    /// Decodes a VIN into vehicle attributes.
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes>;
}

/// Logged-in VINMatchPro session.
pub struct VinMatchClient {
    client: Client,
    base_url: String,
}

impl VinMatchClient {
    /// Creates a client for the configured portal URL and signs in.
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::connect_to(config, config.vinmatch.url.clone()).await
    }

    /// Creates a client against a custom base URL and signs in (for testing).
    pub async fn connect_to(config: &Config, base_url: String) -> Result<Self> {
        let (username, password) = config.decoder_credentials()?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.vinmatch.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        client.login(username, password).await?;
        Ok(client)
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, SIGN_IN_PATH);
        info!("Logging into VINMatchPro as {}", username);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .send()
            .await
            .context("Failed to load sign-in page")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Sign-in page failed with status: {}", status);
        }
        let page = response.text().await.context("Failed to read sign-in page")?;

        let mut form = parse_hidden_fields(&page);
        form.set("user[email]", username);
        form.set(PASSWORD_FIELD, password);

        debug!("POST {} ({} fields)", url, form.len());
        let response = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Referer", url.as_str())
            .body(form.encode())
            .send()
            .await
            .context("Failed to submit sign-in form")?;

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            anyhow::bail!("Sign-in failed with status: {}", status);
        }
        let body = response.text().await.context("Failed to read sign-in response")?;
        if body.contains(PASSWORD_FIELD) {
            return Err(DecodeError::LoginRejected { username: username.to_string() }.into());
        }

        debug!("Signed in");
        Ok(())
    }
}

#[async_trait]
impl VehicleDecoder for VinMatchClient {
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes> {
        let url = format!("{}{}/{}", self.base_url, DECODE_PATH, vin);
        info!("Decoding VIN {}", vin);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .with_context(|| format!("Failed to request decode page for {}", vin))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Decode request for {} failed with status: {}", vin, status);
        }

        let html = response.text().await.context("Failed to read decode page")?;
        Ok(parse_decode_page(&html, vin)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIN: &str = "JT3HN86R0X0197825";

    const SIGN_IN_PAGE: &str = r#"
        <form action="/users/sign_in" method="post">
            <input type="hidden" name="authenticity_token" value="tok123">
            <input type="email" name="user[email]">
            <input type="password" name="user[password]">
        </form>
    "#;

    fn make_test_config() -> Config {
        let mut config = Config::new();
        config.vinmatch.username = Some("shop@example.com".to_string());
        config.vinmatch.password = Some("secret".to_string());
        config
    }

    async fn mount_sign_in(server: &MockServer, post_body: &str) {
        Mock::given(method("GET"))
            .and(path(SIGN_IN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(SIGN_IN_PAGE))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path(SIGN_IN_PATH))
            .and(body_string_contains("authenticity_token=tok123"))
            .and(body_string_contains("user%5Bemail%5D=shop%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(post_body.to_string()))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_and_decode() {
        let mock_server = MockServer::start().await;
        mount_sign_in(&mock_server, "<html>Dashboard</html>").await;

        Mock::given(method("GET"))
            .and(path(format!("/decode/{}", VIN)))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<body><h1>1999 Toyota 4Runner</h1><div>Engine:</div><div>3.4L V6</div></body>",
            ))
            .mount(&mock_server)
            .await;

        let client = VinMatchClient::connect_to(&make_test_config(), mock_server.uri())
            .await
            .unwrap();
        let vehicle = client.decode(VIN).await.unwrap();

        assert_eq!(vehicle.vin, VIN);
        assert_eq!(vehicle.title(), "1999 Toyota 4Runner");
        assert_eq!(vehicle.engine(), "3.4L V6");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mock_server = MockServer::start().await;
        mount_sign_in(&mock_server, SIGN_IN_PAGE).await;

        let err = VinMatchClient::connect_to(&make_test_config(), mock_server.uri())
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::LoginRejected { username: "shop@example.com".to_string() })
        );
    }

    #[tokio::test]
    async fn test_unreadable_sign_in_response_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SIGN_IN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(SIGN_IN_PAGE))
            .mount(&mock_server)
            .await;

        // Claims gzip but the body is plain text, so decoding fails
        Mock::given(method("POST"))
            .and(path(SIGN_IN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Encoding", "gzip")
                    .set_body_bytes(b"not gzip at all".to_vec()),
            )
            .mount(&mock_server)
            .await;

        let err = VinMatchClient::connect_to(&make_test_config(), mock_server.uri())
            .await
            .err()
            .unwrap();
        assert!(err.downcast_ref::<DecodeError>().is_none());
    }

    #[tokio::test]
    async fn test_decode_without_year_fails() {
        let mock_server = MockServer::start().await;
        mount_sign_in(&mock_server, "<html>Dashboard</html>").await;

        Mock::given(method("GET"))
            .and(path(format!("/decode/{}", VIN)))
            .respond_with(ResponseTemplate::new(200).set_body_string("<body>Loading...</body>"))
            .mount(&mock_server)
            .await;

        let client = VinMatchClient::connect_to(&make_test_config(), mock_server.uri())
            .await
            .unwrap();
        let err = client.decode(VIN).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::MissingYear { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        let err = VinMatchClient::connect_to(&Config::new(), "http://127.0.0.1:9".to_string())
            .await
            .err()
            .unwrap();
        assert!(err.downcast_ref::<crate::error::ConfigError>().is_some());
    }
}
