use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

pub fn create_client(user_agent: &str, timeout_seconds: u64) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;

    Ok(client)
}

pub async fn fetch_with_retry(client: &Client, url: &str, max_retries: u32) -> Result<Response> {
    fetch_with_backoff(client, url, max_retries, Duration::from_secs(1)).await
}

/// Delay before retry `n` is `base_delay * 2^n`.
async fn fetch_with_backoff(
    client: &Client,
    url: &str,
    max_retries: u32,
    base_delay: Duration,
) -> Result<Response> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                } else {
                    let status = response.status();
                    warn!("HTTP error {}: {}", status, url);
                    last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
                }
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = base_delay * 2u32.pow(attempts);
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, max_retries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_first_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/speiseplan.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client("test-agent", 5).unwrap();
        let url = format!("{}/speiseplan.html", server.uri());
        let body = fetch_with_backoff(&client, &url, 3, Duration::from_millis(1))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let client = create_client("test-agent", 5).unwrap();
        let url = format!("{}/bulletin.pdf", server.uri());
        let err = fetch_with_backoff(&client, &url, 2, Duration::from_millis(1))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("after 2 attempts"));
    }
}
