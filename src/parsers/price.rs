use once_cell::sync::Lazy;
use regex::Regex;

/// Per-dish marker on the bulletin's price line: student / staff price followed
/// by the energy value, e.g. `€ 2,10 / € 3,40 kJ 1800`.
pub static PRICE_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"€.*?/.*?€.*?kJ\s[0-9]+")
        .expect("Invalid price anchor regex")
});

static DUAL_PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"€.*?/.*?€ *[0-9,]+")
        .expect("Invalid dual price regex")
});

/// Extract the `€ x / € y` part of a bulletin price cell, dropping the energy value.
pub fn extract_dual_price(cell: &str) -> Option<&str> {
    DUAL_PRICE_REGEX.find(cell).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_price_keeps_both_prices_verbatim() {
        assert_eq!(
            extract_dual_price("€ 2,10 / € 3,40 kJ 1800"),
            Some("€ 2,10 / € 3,40")
        );
        assert_eq!(extract_dual_price("€2,10/€3,40"), Some("€2,10/€3,40"));
    }

    #[test]
    fn single_price_is_not_a_dual_price() {
        assert_eq!(extract_dual_price("€ 2,10 kJ 1800"), None);
        assert_eq!(extract_dual_price("Linsensuppe"), None);
    }

    #[test]
    fn anchor_matches_do_not_overlap() {
        let line = "  € 2,10 / € 3,40 kJ 1800   € 3,50 / € 4,80 kJ 2500";
        let matches: Vec<&str> = PRICE_ANCHOR_REGEX.find_iter(line).map(|m| m.as_str()).collect();
        assert_eq!(
            matches,
            vec!["€ 2,10 / € 3,40 kJ 1800", "€ 3,50 / € 4,80 kJ 2500"]
        );
    }
}
