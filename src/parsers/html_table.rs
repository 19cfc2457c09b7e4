use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::MensaConfig;
use crate::error::{MenuError, Result};
use crate::models::{MenuEntry, Source};
use crate::parsers::normalize_property_label;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Invalid cell selector"));
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("strong").expect("Invalid name selector"));
static ICON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Invalid icon selector"));

/// Cells per dish row: name, properties, price.
const CELLS_PER_ROW: usize = 3;

/// Reads one day's menu table out of the Mensa page.
///
/// Each day lives in a `div` tagged with the date (`longdesc="2024-05-13"`);
/// its first table row is the header.
#[derive(Debug, Clone)]
pub struct HtmlMenuExtractor {
    date_format: String,
    section_attribute: String,
}

impl HtmlMenuExtractor {
    pub fn new(date_format: impl Into<String>, section_attribute: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            section_attribute: section_attribute.into(),
        }
    }

    pub fn from_config(config: &MensaConfig) -> Self {
        Self::new(&config.date_format, &config.section_attribute)
    }

    pub fn extract(&self, html: &str, date: NaiveDate) -> Result<Vec<MenuEntry>> {
        let day_tag = date.format(&self.date_format).to_string();
        let query = format!("div[{}=\"{}\"]", self.section_attribute, day_tag);
        let section_selector = Selector::parse(&query)
            .map_err(|e| MenuError::InvalidSelector(format!("{}: {:?}", query, e)))?;

        let document = Html::parse_document(html);
        let section = document.select(&section_selector).next().ok_or_else(|| {
            mismatch(format!(
                "no section for {}, layout changed or date not published",
                day_tag
            ))
        })?;

        let mut entries = Vec::new();

        for (index, row) in section.select(&ROW_SELECTOR).enumerate().skip(1) {
            let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
            if cells.len() != CELLS_PER_ROW {
                return Err(mismatch(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    cells.len(),
                    CELLS_PER_ROW
                )));
            }

            entries.push(parse_row(&cells[0], &cells[1], &cells[2]));
        }

        debug!("Extracted {} Mensa entries for {}", entries.len(), day_tag);
        Ok(entries)
    }
}

fn mismatch(reason: String) -> MenuError {
    warn!("Mensa: {}", reason);
    MenuError::layout(Source::Mensa, reason)
}

fn parse_row(name_cell: &ElementRef, properties_cell: &ElementRef, price_cell: &ElementRef) -> MenuEntry {
    let name = name_cell
        .select(&NAME_SELECTOR)
        .next()
        .map(|strong| text_without_annotations(strong).trim().to_string())
        .unwrap_or_default();

    let properties = properties_cell
        .select(&ICON_SELECTOR)
        .filter_map(|icon| icon.value().attr("alt"))
        .map(normalize_property_label)
        .collect::<Vec<_>>()
        .join(", ");

    let price = price_cell.text().collect::<String>().trim().to_string();

    MenuEntry::new(name, price).with_properties(properties)
}

/// Text content with `<small>` annotations left out.
fn text_without_annotations(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "small" => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}
