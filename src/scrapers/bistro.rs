use async_trait::async_trait;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::models::{MenuEntry, Source};
use crate::parsers::FixedWidthExtractor;
use crate::scrapers::MenuScraper;
use crate::utils::converter::convert_pdf_to_text;
use crate::utils::http::fetch_with_retry;
use crate::utils::locale::{day_name, parse_locale, week_number};

/// Weekly PDF bulletin of the hospital bistro, one file per ISO week.
pub struct BistroScraper {
    config: Arc<Config>,
    extractor: FixedWidthExtractor,
}

impl BistroScraper {
    pub fn new(config: Arc<Config>) -> Self {
        let extractor = FixedWidthExtractor::from_config(&config.bistro);
        Self { config, extractor }
    }
}

#[async_trait]
impl MenuScraper for BistroScraper {
    async fn fetch_menu(&self, client: &Client, date: NaiveDate) -> Result<Vec<MenuEntry>> {
        let bistro = &self.config.bistro;
        let locale = parse_locale(&bistro.locale)?;
        let week = week_number(date);
        let day = day_name(date, locale);
        let url = bistro.bulletin_url(week);
        info!("Fetching bistro bulletin for week {} ({})", week, day);

        let response = fetch_with_retry(client, &url, self.config.max_retries).await?;
        let bytes = response.bytes().await?;

        let work_dir = bistro.work_dir();
        let pdf_name = format!("bistro{}.pdf", week);
        let txt_name = format!("bistro{}.txt", week);
        tokio::fs::write(work_dir.join(&pdf_name), &bytes)
            .await
            .with_context(|| format!("Failed to store bulletin in {}", work_dir.display()))?;

        let report_text = convert_pdf_to_text(&bistro.converter, &work_dir, &pdf_name, &txt_name).await?;

        let entries = self.extractor.extract(&report_text, date, &day)?;
        info!("Found {} dishes in the bistro bulletin", entries.len());

        Ok(entries)
    }

    fn source(&self) -> Source {
        Source::Bistro
    }

    fn display_name(&self) -> &str {
        &self.config.bistro.name
    }
}
