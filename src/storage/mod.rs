use async_trait::async_trait;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod json_file;
pub use json_file::JsonFileStore;

/// OAuth state for the messaging account, persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub auth_code: Option<String>,
    pub access_token: Option<String>,
    pub access_token_expires: Option<DateTime<Utc>>,
    pub refresh_token: Option<String>,
    pub refresh_token_expires: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Credentials>;
    async fn save(&self, credentials: &Credentials) -> Result<()>;
}
