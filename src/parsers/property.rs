use crate::models::DEFAULT_PROPERTY_LABEL;

/// Normalize the description of a dietary icon.
///
/// Icons without a description stand for poultry on the Mensa page, so an
/// empty label becomes [`DEFAULT_PROPERTY_LABEL`]. Only the first character
/// is upper-cased; the rest is left as published.
pub fn normalize_property_label(raw_label: &str) -> String {
    let trimmed = raw_label.trim();
    let label = if trimmed.is_empty() {
        DEFAULT_PROPERTY_LABEL
    } else {
        trimmed
    };

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
