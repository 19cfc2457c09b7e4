pub mod menu;
pub mod source;

pub use menu::*;
pub use source::*;

/// Currency marker used by both the bulletin layout and the price cells.
pub const CURRENCY_MARKER: char = '€';

/// Label used when a dietary icon carries no description.
pub const DEFAULT_PROPERTY_LABEL: &str = "Geflügel";
