use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Mensa,
    Bistro,
}

impl Source {
    pub fn key(&self) -> &'static str {
        match self {
            Source::Mensa => "mensa",
            Source::Bistro => "bistro",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_key() {
        assert_eq!(Source::Mensa.to_string(), "mensa");
        assert_eq!(Source::Bistro.to_string(), "bistro");
    }
}
