//! Text templates used to render report sections.

use super::{ClassSection, ContractSection};

/// Number of dashes in the section separator.
pub const SEPARATOR_WIDTH: usize = 89;

/// Fixed markup wrapped around report content.
///
/// Property rows have no opening `<tr>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub property_heading: &'static str,
    pub table_open: &'static str,
    pub table_close: &'static str,
    pub property_row_start: &'static str,
    pub property_row_end: &'static str,
    pub member_row_start: &'static str,
    pub member_row_end: &'static str,
    pub separator_end: &'static str,
}

impl Markup {
    /// The HTML fragment markup.
    pub const fn html() -> Self {
        Self {
            property_heading: "<p>Dependency properties</p>",
            table_open: "<table>",
            table_close: "</table>",
            property_row_start: "<td>",
            property_row_end: "</td><td></td></tr>",
            member_row_start: "<tr><td>",
            member_row_end: ": </td><td></td></tr>",
            separator_end: "<br />",
        }
    }

    /// Render every section in order and concatenate the results.
    pub fn render(&self, sections: &[ClassSection]) -> String {
        let rendered: Vec<String> = sections.iter().map(|s| self.render_section(s)).collect();
        rendered.concat()
    }

    /// Render one class section. Every emitted line ends with `\n`.
    pub fn render_section(&self, section: &ClassSection) -> String {
        let mut lines = Vec::with_capacity(section.properties.len() + 4);

        lines.push(self.property_heading.to_string());
        lines.push(self.table_open.to_string());
        for declared_type in &section.properties {
            lines.push(format!(
                "{}{}{}",
                self.property_row_start, declared_type, self.property_row_end
            ));
        }
        lines.push(self.table_close.to_string());

        if let Some(contract) = &section.contract {
            self.contract_lines(&section.class, contract, &mut lines);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn contract_lines(&self, class: &str, contract: &ContractSection, lines: &mut Vec<String>) {
        if !contract.business.is_empty() {
            lines.push(format!(
                "\"{}\" API with \"{}\" interface",
                class, contract.business
            ));
        }

        self.member_table(&contract.operations, lines);
        lines.push(format!("\"{}\" used as data structure", contract.dto));
        self.member_table(&contract.fields, lines);

        lines.push(format!("{}{}", "-".repeat(SEPARATOR_WIDTH), self.separator_end));
    }

    fn member_table(&self, names: &[String], lines: &mut Vec<String>) {
        lines.push(self.table_open.to_string());
        lines.extend(
            names
                .iter()
                .map(|n| format!("{}{}{}", self.member_row_start, n, self.member_row_end)),
        );
        lines.push(self.table_close.to_string());
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self::html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_section() -> ClassSection {
        ClassSection {
            class: "MyClass".to_string(),
            properties: vec!["IService".to_string()],
            contract: Some(ContractSection {
                business: "Business".to_string(),
                dto: "Dto".to_string(),
                operations: vec!["Get".to_string(), "Set".to_string()],
                fields: vec!["Id".to_string(), "Name".to_string()],
            }),
        }
    }

    #[test]
    fn test_render_contract_section() {
        let out = Markup::html().render_section(&contract_section());
        let separator = format!("{}<br />", "-".repeat(89));
        let expected = [
            "<p>Dependency properties</p>",
            "<table>",
            "<td>IService</td><td></td></tr>",
            "</table>",
            "\"MyClass\" API with \"Business\" interface",
            "<table>",
            "<tr><td>Get: </td><td></td></tr>",
            "<tr><td>Set: </td><td></td></tr>",
            "</table>",
            "\"Dto\" used as data structure",
            "<table>",
            "<tr><td>Id: </td><td></td></tr>",
            "<tr><td>Name: </td><td></td></tr>",
            "</table>",
            separator.as_str(),
        ]
        .join("\n")
            + "\n";

        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_empty_property_table() {
        let section = ClassSection {
            class: "Empty".to_string(),
            properties: vec![],
            contract: None,
        };
        let out = Markup::html().render_section(&section);
        assert_eq!(out, "<p>Dependency properties</p>\n<table>\n</table>\n");
    }

    #[test]
    fn test_empty_business_name_skips_header() {
        let mut section = contract_section();
        if let Some(contract) = section.contract.as_mut() {
            contract.business.clear();
        }
        let out = Markup::html().render_section(&section);

        assert!(!out.contains("API with"));
        assert!(out.contains("\"Dto\" used as data structure"));
    }

    #[test]
    fn test_render_concatenates_in_order() {
        let mut second = contract_section();
        second.class = "Other".to_string();
        let markup = Markup::html();

        let out = markup.render(&[contract_section(), second.clone()]);
        let first_pos = out.find("\"MyClass\" API").unwrap();
        let second_pos = out.find("\"Other\" API").unwrap();
        assert!(first_pos < second_pos);
        assert_eq!(
            out,
            markup.render_section(&contract_section()) + &markup.render_section(&second)
        );
    }
}
