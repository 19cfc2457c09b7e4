use thiserror::Error;

use crate::models::Source;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// The source document no longer has the shape the extractor expects.
    #[error("{origin} layout mismatch: {reason}")]
    LayoutMismatch { origin: Source, reason: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl MenuError {
    pub fn layout(origin: Source, reason: impl Into<String>) -> Self {
        MenuError::LayoutMismatch {
            origin,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
