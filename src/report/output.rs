//! Output writers for assembled reports.
//!
//! - JSON: structured sections for programmatic consumption
//! - Summary: colored terminal block on stderr, so it never mixes with a
//!   report written to stdout

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::ClassSection;

/// Counts describing one report run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub classes: usize,
    pub contracts: usize,
    pub operations: usize,
    pub fields: usize,
}

impl ReportStats {
    pub fn from_sections(sections: &[ClassSection]) -> Self {
        sections
            .iter()
            .fold(ReportStats::default(), |mut stats, section| {
                stats.classes += 1;
                if let Some(contract) = &section.contract {
                    stats.contracts += 1;
                    stats.operations += contract.operations.len();
                    stats.fields += contract.fields.len();
                }
                stats
            })
    }
}

/// JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    pub stats: ReportStats,
    pub sections: Vec<ClassSection>,
}

/// Write sections in JSON format.
pub fn write_json<W: Write>(
    out: &mut W,
    source: &str,
    project: &str,
    sections: &[ClassSection],
) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: source.to_string(),
        project: project.to_string(),
        stats: ReportStats::from_sections(sections),
        sections: sections.to_vec(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Write a short human-readable summary of the run to stderr.
pub fn write_summary(source: &str, project: &str, destination: &str, stats: &ReportStats) {
    eprintln!();
    eprint!("  ");
    eprint!("{}", "apiskel".cyan().bold());
    eprintln!(" v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();

    eprint!("  {}", "Source:   ".dimmed());
    eprintln!("{}", source);
    if !project.is_empty() {
        eprint!("  {}", "Project:  ".dimmed());
        eprintln!("{}", project);
    }
    eprint!("  {}", "Output:   ".dimmed());
    eprintln!("{}", destination);
    eprintln!();

    if stats.classes == 0 {
        eprintln!("  {}", "No classes found".yellow());
    } else {
        eprint!("  {}", "✓".green());
        eprintln!(
            " {} documented, {} with contracts",
            plural(stats.classes, "class", "classes"),
            stats.contracts.to_string().bold()
        );
        eprintln!(
            "    {}",
            format!(
                "{} operations, {} fields",
                stats.operations, stats.fields
            )
            .dimmed()
        );
    }
    eprintln!();
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ContractSection;

    fn sections() -> Vec<ClassSection> {
        vec![
            ClassSection {
                class: "OrdersController".to_string(),
                properties: vec!["IOrderService".to_string()],
                contract: Some(ContractSection {
                    business: "IOrderBusiness".to_string(),
                    dto: "OrderDto".to_string(),
                    operations: vec!["Get".to_string(), "Create".to_string()],
                    fields: vec!["Id".to_string()],
                }),
            },
            ClassSection {
                class: "HomeController".to_string(),
                properties: vec![],
                contract: None,
            },
        ]
    }

    #[test]
    fn test_stats_from_sections() {
        let stats = ReportStats::from_sections(&sections());
        assert_eq!(
            stats,
            ReportStats {
                classes: 2,
                contracts: 1,
                operations: 2,
                fields: 1,
            }
        );
    }

    #[test]
    fn test_write_json_fields() {
        let mut buf = Vec::new();
        write_json(&mut buf, "src", "Shop.Api", &sections()).unwrap();
        let json = String::from_utf8(buf).unwrap();

        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.project, "Shop.Api");
        assert_eq!(parsed.stats.contracts, 1);
        assert_eq!(parsed.sections, sections());

        assert!(json.contains("\"business\""));
        assert!(!json.contains("\"contract\": null"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "class", "classes"), "1 class");
        assert_eq!(plural(3, "class", "classes"), "3 classes");
    }
}
