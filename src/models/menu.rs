use serde::{Deserialize, Serialize};
use std::fmt;

/// One dish as published by a source.
///
/// `price` is kept in the source's own notation ("2,50 €", "€ 3,10 / € 4,60")
/// because the formats are not uniform enough to parse into a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: String,
    pub price: String,
    pub properties: Option<String>,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.properties.as_deref() {
            Some(props) if !props.is_empty() => {
                write!(f, "{}    [{}; {}]", self.name, self.price, props)
            }
            _ => write!(f, "{}    [{}]", self.name, self.price),
        }
    }
}
