use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BistroConfig;
use crate::error::{MenuError, Result};
use crate::models::{MenuEntry, Source, CURRENCY_MARKER};
use crate::parsers::{extract_dual_price, PRICE_ANCHOR_REGEX};

/// How the row holding a dish's price is located inside a day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRowPolicy {
    /// First row of the column whose cell contains the currency marker.
    #[default]
    SearchForPriceRow,
    /// Last row of the day block, whatever it contains.
    FixedLastRowIsPriceRow,
}

/// Horizontal extent of one dish, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBounds {
    pub start: usize,
    pub length: usize,
}

impl ColumnBounds {
    /// Slice `line` at these bounds. Short lines give a shorter (or no) cell.
    pub fn cell(&self, line: &str) -> Option<String> {
        let text: String = line.chars().skip(self.start).take(self.length).collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Column bounds from the price markers on `line`, left to right.
///
/// Offsets are counted in characters: `€` and umlauts are multi-byte, and the
/// other lines of the block are aligned by character position.
pub fn column_bounds(line: &str) -> Vec<ColumnBounds> {
    PRICE_ANCHOR_REGEX
        .find_iter(line)
        .map(|m| ColumnBounds {
            start: line[..m.start()].chars().count(),
            length: m.as_str().chars().count(),
        })
        .collect()
}

/// Cells of one day block, row-major. `None` marks an empty cell.
#[derive(Debug)]
struct DayGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<String>>,
}

impl DayGrid {
    fn slice(lines: &[&str], bounds: &[ColumnBounds]) -> Self {
        let rows = lines.len();
        let columns = bounds.len();
        let mut cells = Vec::with_capacity(rows * columns);
        for line in lines {
            cells.extend(bounds.iter().map(|b| b.cell(line)));
        }
        Self { rows, columns, cells }
    }

    fn get(&self, row: usize, column: usize) -> Option<&str> {
        debug_assert!(column < self.columns);
        self.cells
            .get(row * self.columns + column)
            .and_then(|cell| cell.as_deref())
    }
}

/// Reads one day out of the text rendering of the weekly bistro bulletin.
///
/// The bulletin lays out every day as a block of `day_span` lines, starting
/// with the line that begins with the weekday name. Dishes sit side by side;
/// the line with the `€ x / € y kJ n` markers tells where each dish's column
/// starts and how wide it is.
#[derive(Debug, Clone)]
pub struct FixedWidthExtractor {
    day_span: usize,
    price_row_policy: PriceRowPolicy,
}

impl FixedWidthExtractor {
    pub fn new(day_span: usize, price_row_policy: PriceRowPolicy) -> Self {
        Self {
            day_span,
            price_row_policy,
        }
    }

    pub fn from_config(config: &BistroConfig) -> Self {
        Self::new(config.day_span, config.price_row_policy)
    }

    pub fn extract(
        &self,
        report_text: &str,
        date: NaiveDate,
        locale_day_name: &str,
    ) -> Result<Vec<MenuEntry>> {
        let lines: Vec<&str> = report_text
            .split(|c| c == '\r' || c == '\n')
            .filter(|line| !line.is_empty())
            .collect();

        let day_prefix = locale_day_name.to_lowercase();
        let row = lines
            .iter()
            .position(|line| !day_prefix.is_empty() && line.to_lowercase().starts_with(&day_prefix))
            .ok_or_else(|| mismatch(date, format!("no line starts with '{}'", locale_day_name)))?;

        let anchor = lines[row..]
            .iter()
            .position(|line| line.contains(CURRENCY_MARKER))
            .map(|offset| row + offset)
            .ok_or_else(|| mismatch(date, format!("no price line after '{}'", locale_day_name)))?;

        let bounds = column_bounds(lines[anchor]);
        if bounds.is_empty() {
            return Err(mismatch(date, format!("no price markers on line {}", anchor)));
        }

        let block = lines.get(row..row + self.day_span).ok_or_else(|| {
            mismatch(
                date,
                format!(
                    "day block at line {} needs {} lines, only {} left",
                    row,
                    self.day_span,
                    lines.len() - row
                ),
            )
        })?;

        let grid = DayGrid::slice(block, &bounds);
        debug!(
            "Bistro day block for {}: lines {}..{}, {} columns",
            date,
            row,
            row + grid.rows,
            grid.columns
        );

        (0..grid.columns)
            .map(|column| self.column_entry(&grid, column, date))
            .collect()
    }

    fn column_entry(&self, grid: &DayGrid, column: usize, date: NaiveDate) -> Result<MenuEntry> {
        let price_row = match self.price_row_policy {
            PriceRowPolicy::SearchForPriceRow => (0..grid.rows)
                .find(|&row| {
                    grid.get(row, column)
                        .map_or(false, |cell| cell.contains(CURRENCY_MARKER))
                })
                .ok_or_else(|| mismatch(date, format!("column {} has no price", column)))?,
            PriceRowPolicy::FixedLastRowIsPriceRow => grid.rows.saturating_sub(1),
        };

        let price_cell = grid
            .get(price_row, column)
            .ok_or_else(|| mismatch(date, format!("column {} has an empty price row", column)))?;
        let price = extract_dual_price(price_cell).ok_or_else(|| {
            mismatch(
                date,
                format!("column {} price '{}' is not a dual price", column, price_cell),
            )
        })?;

        let name = (0..price_row)
            .filter_map(|row| grid.get(row, column))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(MenuEntry::new(name, price))
    }
}

fn mismatch(date: NaiveDate, reason: String) -> MenuError {
    warn!("Bistro {}: {}", date, reason);
    MenuError::layout(Source::Bistro, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PRICE_A: &str = "€ 2,10 / € 3,40 kJ 1800";
    const PRICE_B: &str = "€ 3,50 / € 4,80 kJ 2500";

    fn row(label: &str, left: &str, right: &str) -> String {
        format!("{:<14}{:<24}{}", label, left, right)
    }

    fn bulletin() -> String {
        [
            "Speiseplan Bistro KW 20".to_string(),
            String::new(),
            row("Montag", "Linsensuppe", "Hähnchenbrust"),
            row("", "mit Brot", "mit Reis"),
            row("", "und Butter", ""),
            row("", PRICE_A, PRICE_B),
            row("Dienstag", "Gemüsecurry", "Spaghetti"),
            row("", "", "Bolognese"),
            row("", "", ""),
            row("", "€ 2,60 / € 3,90 kJ 2100", "€ 2,90 / € 4,20 kJ 3000"),
        ]
        .join("\r\n")
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn extractor() -> FixedWidthExtractor {
        FixedWidthExtractor::new(4, PriceRowPolicy::SearchForPriceRow)
    }

    #[test]
    fn extracts_one_entry_per_price_marker() {
        let entries = extractor().extract(&bulletin(), monday(), "Montag").unwrap();

        assert_eq!(
            entries,
            vec![
                MenuEntry::new("Linsensuppe, mit Brot, und Butter", "€ 2,10 / € 3,40"),
                MenuEntry::new("Hähnchenbrust, mit Reis", "€ 3,50 / € 4,80"),
            ]
        );
    }

    #[test]
    fn day_name_match_ignores_case() {
        let entries = extractor().extract(&bulletin(), tuesday(), "DIENSTAG").unwrap();

        assert_eq!(
            entries,
            vec![
                MenuEntry::new("Gemüsecurry", "€ 2,60 / € 3,90"),
                MenuEntry::new("Spaghetti, Bolognese", "€ 2,90 / € 4,20"),
            ]
        );
    }

    #[test]
    fn fixed_last_row_policy_reads_price_from_block_end() {
        let extractor = FixedWidthExtractor::new(4, PriceRowPolicy::FixedLastRowIsPriceRow);
        let entries = extractor.extract(&bulletin(), monday(), "Montag").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Hähnchenbrust, mit Reis");
        assert_eq!(entries[1].price, "€ 3,50 / € 4,80");
    }

    #[test]
    fn fixed_last_row_policy_fails_when_block_is_too_long() {
        let extractor = FixedWidthExtractor::new(5, PriceRowPolicy::FixedLastRowIsPriceRow);
        let result = extractor.extract(&bulletin(), monday(), "Montag");

        assert!(matches!(
            result,
            Err(MenuError::LayoutMismatch { origin: Source::Bistro, .. })
        ));
    }

    #[test]
    fn trailing_whitespace_does_not_change_cells() {
        let padded = bulletin()
            .split("\r\n")
            .map(|line| format!("{}        ", line))
            .collect::<Vec<_>>()
            .join("\n");

        let plain = extractor().extract(&bulletin(), monday(), "Montag").unwrap();
        let padded = extractor().extract(&padded, monday(), "Montag").unwrap();

        assert_eq!(plain, padded);
    }

    #[test]
    fn missing_day_is_a_layout_mismatch() {
        let result = extractor().extract(&bulletin(), monday(), "Samstag");
        assert!(matches!(result, Err(MenuError::LayoutMismatch { .. })));
    }

    #[test]
    fn price_line_without_markers_is_a_layout_mismatch() {
        let text = [
            row("Montag", "Linsensuppe", ""),
            row("", "mit Brot", ""),
            row("", "", ""),
            row("", "Preis 2,10 €", ""),
        ]
        .join("\n");

        let result = extractor().extract(&text, monday(), "Montag");
        assert!(matches!(result, Err(MenuError::LayoutMismatch { .. })));
    }

    #[test]
    fn truncated_report_is_a_layout_mismatch() {
        let text = [row("Montag", "Linsensuppe", ""), row("", PRICE_A, "")].join("\n");

        let result = extractor().extract(&text, monday(), "Montag");
        assert!(matches!(result, Err(MenuError::LayoutMismatch { .. })));
    }

    #[test]
    fn column_bounds_count_characters_not_bytes() {
        let line = format!("{:<14}{} {}", "Müsli €", PRICE_A, PRICE_B);
        let bounds = column_bounds(&line);

        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].start, 6);
        assert_eq!(
            bounds[1],
            ColumnBounds {
                start: 14 + PRICE_A.chars().count() + 1,
                length: PRICE_B.chars().count(),
            }
        );
    }

    #[test]
    fn cell_is_clamped_to_short_lines() {
        let bounds = ColumnBounds { start: 4, length: 10 };

        assert_eq!(bounds.cell("    Suppe"), Some("Suppe".to_string()));
        assert_eq!(bounds.cell("abc"), None);
        assert_eq!(bounds.cell("            "), None);
    }
}
