use crate::models::MenuEntry;

/// One source's block in the posted message.
#[derive(Debug, Clone)]
pub struct MenuSection {
    pub title: String,
    /// Entries, or the diagnostic explaining why the source could not be read.
    pub menu: Result<Vec<MenuEntry>, String>,
}

impl MenuSection {
    pub fn new(title: impl Into<String>, menu: Result<Vec<MenuEntry>, String>) -> Self {
        Self {
            title: title.into(),
            menu,
        }
    }
}

pub fn build_markdown(sections: &[MenuSection]) -> String {
    sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_section(section: &MenuSection) -> String {
    let mut out = format!("**{}**\n", section.title);
    match &section.menu {
        Ok(entries) => {
            for entry in entries {
                out.push_str(&format!("- {}\n", entry));
            }
        }
        Err(diagnostic) => out.push_str(&format!("_Menu unavailable: {}_\n", diagnostic)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_sections_in_order() {
        let sections = vec![
            MenuSection::new(
                "Mensa",
                Ok(vec![
                    MenuEntry::new("Linsensuppe", "2,50 €").with_properties("Vegan"),
                    MenuEntry::new("Pasta", "1,90 €").with_properties(""),
                ]),
            ),
            MenuSection::new(
                "UKSH Bistro",
                Ok(vec![MenuEntry::new("Hähnchenbrust, mit Reis", "€ 3,50 / € 4,80")]),
            ),
        ];

        assert_eq!(
            build_markdown(&sections),
            "**Mensa**\n\
             - Linsensuppe    [2,50 €; Vegan]\n\
             - Pasta    [1,90 €]\n\
             \n\
             **UKSH Bistro**\n\
             - Hähnchenbrust, mit Reis    [€ 3,50 / € 4,80]\n"
        );
    }

    #[test]
    fn failed_source_keeps_its_heading() {
        let sections = vec![
            MenuSection::new("Mensa", Err("mensa layout mismatch: no section".to_string())),
            MenuSection::new("UKSH Bistro", Ok(Vec::new())),
        ];

        assert_eq!(
            build_markdown(&sections),
            "**Mensa**\n_Menu unavailable: mensa layout mismatch: no section_\n\n**UKSH Bistro**\n"
        );
    }
}
