use async_trait::async_trait;
use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Client;
use crate::models::{MenuEntry, Source};

mod bistro;
mod mensa;

pub use bistro::BistroScraper;
pub use mensa::MensaScraper;

#[async_trait]
pub trait MenuScraper: Send + Sync {
    async fn fetch_menu(&self, client: &Client, date: NaiveDate) -> Result<Vec<MenuEntry>>;
    fn source(&self) -> Source;
    fn display_name(&self) -> &str;
}
