use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::config::WebexConfig;
use crate::storage::{CredentialStore, Credentials};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: String,
    refresh_token_expires_in: i64,
}

/// URL the operator opens once to grant access; the redirect carries `code`.
pub fn authorize_url(config: &WebexConfig) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/authorize", config.api_base_url))
        .context("Invalid Webex API base URL")?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", &config.scope);
    Ok(url)
}

/// Hands out a valid access token, exchanging or refreshing it as needed.
pub struct TokenManager<S> {
    client: Client,
    config: WebexConfig,
    store: S,
}

impl<S: CredentialStore> TokenManager<S> {
    pub fn new(client: Client, config: WebexConfig, store: S) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub async fn access_token(&self, now: DateTime<Utc>) -> Result<String> {
        let mut credentials = self.store.load().await?;

        let auth_code = credentials
            .auth_code
            .clone()
            .context("No authorization code stored, authorize the application first")?;

        if credentials.access_token.is_none() {
            info!("Requesting initial access token...");
            let response = self
                .request_token(&[
                    ("grant_type", "authorization_code"),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", self.config.client_secret.as_str()),
                    ("code", auth_code.as_str()),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                ])
                .await?;
            apply_token(&mut credentials, response, now);
            self.store.save(&credentials).await?;
            info!("Requesting initial access token successful");
        }

        let margin = Duration::hours(self.config.refresh_margin_hours);
        let expires = credentials.access_token_expires.unwrap_or(now);
        if expires < now + margin {
            info!("Access token expires at {}, refreshing", expires);
            let refresh_token = credentials
                .refresh_token
                .clone()
                .context("Access token is expiring and no refresh token is stored")?;
            let response = self
                .request_token(&[
                    ("grant_type", "refresh_token"),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", self.config.client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                ])
                .await?;
            apply_token(&mut credentials, response, now);
            self.store.save(&credentials).await?;
            info!("Requesting new access token successful");
        }

        credentials
            .access_token
            .context("No access token after authorization")
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(format!("{}/access_token", self.config.api_base_url))
            .form(params)
            .send()
            .await
            .context("Failed to request access token")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Token request failed: {} - {}", status, error_text);
        }

        response
            .json::<TokenResponse>()
            .await
            .context("Malformed token response")
    }
}

/// The refresh grant also renews the refresh token, so both are replaced.
fn apply_token(credentials: &mut Credentials, response: TokenResponse, now: DateTime<Utc>) {
    credentials.access_token = Some(response.access_token);
    credentials.access_token_expires = Some(now + Duration::seconds(response.expires_in));
    credentials.refresh_token = Some(response.refresh_token);
    credentials.refresh_token_expires =
        Some(now + Duration::seconds(response.refresh_token_expires_in));
}
