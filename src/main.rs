use anyhow::{Context, Result};
use chrono::{Local, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

mod config;
mod error;
mod models;
mod parsers;
mod scrapers;
mod storage;
mod utils;
mod webex;

use crate::config::{Config, WebexConfig};
use crate::scrapers::{BistroScraper, MensaScraper, MenuScraper};
use crate::storage::{CredentialStore, JsonFileStore};
use crate::webex::{authorize_url, build_markdown, send_message, MenuSection, TokenManager};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mensa_scanner=info".parse()?),
        )
        .init();

    info!("Starting Mensa Scanner");

    // Load configuration
    let config = Arc::new(Config::load()?);

    let client = utils::http::create_client(&config.user_agent, config.request_timeout_seconds)?;

    // Make sure we can post before spending time on the menus
    let store = JsonFileStore::new(&config.webex.credentials_path);
    ensure_auth_code(&store, &config.webex).await?;
    let tokens = TokenManager::new(client.clone(), config.webex.clone(), store);
    let access_token = tokens.access_token(Utc::now()).await?;

    let scrapers: Vec<Box<dyn MenuScraper>> = vec![
        Box::new(MensaScraper::new(config.clone())),
        Box::new(BistroScraper::new(config.clone())),
    ];

    let today = Local::now().date_naive();
    info!("Retrieving menus for {}", today);

    // A failing source only costs its own section
    let sections = join_all(scrapers.iter().map(|scraper| {
        let client = &client;
        async move {
            let name = scraper.display_name().to_string();
            let menu = match scraper.fetch_menu(client, today).await {
                Ok(entries) => {
                    for entry in &entries {
                        info!(source = %scraper.source(), "- {}", entry);
                    }
                    Ok(entries)
                }
                Err(e) => {
                    error!(source = %scraper.source(), "Failed to read {} menu: {:#}", name, e);
                    Err(format!("{:#}", e))
                }
            };
            MenuSection::new(name, menu)
        }
    }))
    .await;

    info!("Posting message...");
    let markdown = build_markdown(&sections);
    send_message(
        &client,
        &config.webex.api_base_url,
        &access_token,
        &config.webex.room_id,
        &markdown,
    )
    .await?;

    Ok(())
}

/// First run only: ask the operator for the code the authorize redirect returned.
async fn ensure_auth_code<S: CredentialStore>(store: &S, webex: &WebexConfig) -> Result<()> {
    let mut credentials = store.load().await?;
    if credentials.auth_code.is_some() {
        return Ok(());
    }

    println!("Please open the following URL and copy the final \"code\" parameter:");
    println!("{}", authorize_url(webex)?);
    println!("Code: ");

    let code = BufReader::new(tokio::io::stdin())
        .lines()
        .next_line()
        .await?
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .context("No authorization code entered")?;

    credentials.auth_code = Some(code);
    store.save(&credentials).await?;
    info!("Authentication code saved");
    Ok(())
}
