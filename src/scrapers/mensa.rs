use async_trait::async_trait;
use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{MenuEntry, Source};
use crate::parsers::HtmlMenuExtractor;
use crate::scrapers::MenuScraper;
use crate::utils::http::fetch_with_retry;

pub struct MensaScraper {
    config: Arc<Config>,
    extractor: HtmlMenuExtractor,
}

impl MensaScraper {
    pub fn new(config: Arc<Config>) -> Self {
        let extractor = HtmlMenuExtractor::from_config(&config.mensa);
        Self { config, extractor }
    }
}

#[async_trait]
impl MenuScraper for MensaScraper {
    async fn fetch_menu(&self, client: &Client, date: NaiveDate) -> Result<Vec<MenuEntry>> {
        info!("Fetching Mensa menu for {}", date);

        let response = fetch_with_retry(client, &self.config.mensa.url, self.config.max_retries).await?;
        let html = response.text().await?;

        let entries = self.extractor.extract(&html, date)?;
        info!("Found {} dishes on the Mensa page", entries.len());

        Ok(entries)
    }

    fn source(&self) -> Source {
        Source::Mensa
    }

    fn display_name(&self) -> &str {
        &self.config.mensa.name
    }
}
