pub mod auth;
pub mod message;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

pub use auth::{authorize_url, TokenManager};
pub use message::{build_markdown, MenuSection};

pub async fn send_message(
    client: &Client,
    api_base_url: &str,
    access_token: &str,
    room_id: &str,
    markdown: &str,
) -> Result<()> {
    let payload = json!({
        "roomId": room_id,
        "markdown": markdown
    });

    let response = client
        .post(format!("{}/messages", api_base_url))
        .bearer_auth(access_token)
        .json(&payload)
        .send()
        .await
        .context("Failed to post Webex message")?;

    if response.status().is_success() {
        info!("Posting message successful");
        Ok(())
    } else {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        error!("Webex message failed with status {}: {}", status, error_text);
        Err(anyhow::anyhow!("Webex message failed: {} - {}", status, error_text))
    }
}
