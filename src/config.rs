use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::parsers::PriceRowPolicy;

/// Base name of the optional settings file (`mensa_scanner.toml`, `.json`, ...).
pub const CONFIG_FILE: &str = "mensa_scanner";

/// Prefix for environment overrides, e.g. `MENSA__WEBEX__ROOM_ID`.
pub const ENV_PREFIX: &str = "MENSA";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mensa: MensaConfig,
    pub bistro: BistroConfig,
    pub webex: WebexConfig,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MensaConfig {
    pub name: String,
    pub url: String,
    /// chrono format used to render the day tag on the section element.
    pub date_format: String,
    pub section_attribute: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BistroConfig {
    pub name: String,
    /// Bulletin URL; `{week}` is replaced by the zero-padded ISO week number.
    pub url_template: String,
    pub locale: String,
    /// Number of text lines a single day occupies in the bulletin.
    pub day_span: usize,
    pub price_row_policy: PriceRowPolicy,
    pub converter: ConverterConfig,
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebexConfig {
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub room_id: String,
    pub credentials_path: PathBuf,
    pub refresh_margin_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mensa: MensaConfig::default(),
            bistro: BistroConfig::default(),
            webex: WebexConfig::default(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) mensa-scanner/0.1".to_string(),
            request_timeout_seconds: 25,
            max_retries: 3,
        }
    }
}

impl Default for MensaConfig {
    fn default() -> Self {
        Self {
            name: "Mensa".to_string(),
            url: "https://www.studentenwerk.sh/de/essen/standorte/luebeck/mensa-luebeck/speiseplan.html".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            section_attribute: "longdesc".to_string(),
        }
    }
}

impl Default for BistroConfig {
    fn default() -> Self {
        Self {
            name: "UKSH Bistro".to_string(),
            url_template: "https://www.uksh.de/uksh_media/Speisepl%C3%A4ne/L%C3%BCbeck+_+UKSH_Bistro/Speiseplan+Bistro+KW+{week}.pdf".to_string(),
            locale: "de_DE".to_string(),
            day_span: 4,
            price_row_policy: PriceRowPolicy::default(),
            converter: ConverterConfig::default(),
            work_dir: None,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "pdftotext".to_string(),
            args: vec!["-layout".to_string()],
        }
    }
}

impl Default for WebexConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://webexapis.com/v1".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://invalid/".to_string(),
            scope: "spark:messages_write".to_string(),
            room_id: String::new(),
            credentials_path: PathBuf::from("credentials.json"),
            refresh_margin_hours: 48,
        }
    }
}

impl Config {
    /// Defaults, then `mensa_scanner.*` in the working directory, then `MENSA__*` env vars.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to read configuration sources")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(config)
    }
}

impl BistroConfig {
    pub fn bulletin_url(&self, week: u32) -> String {
        self.url_template.replace("{week}", &format!("{:02}", week))
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
