//! Report assembly for generic contract hierarchies.
//!
//! Each class becomes one [`ClassSection`]:
//! - a property table built from the class's own properties
//! - for classes deriving from a generic base, a contract part naming the
//!   business type (argument 0) and the DTO type (argument 1), with the
//!   operations of abstract arguments and the fields of concrete ones
//!
//! Classification is pure. Rendering is done per section by a [`Markup`]
//! and the rendered sections are concatenated once at the end.

mod markup;
mod output;

pub use markup::{Markup, SEPARATOR_WIDTH};
pub use output::{write_json, write_summary, JsonReport, ReportStats};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ClassSymbol, MemberKind, TypeArgSymbol};

/// Errors raised while assembling a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error(
        "class {class:?} derives from a generic base with {found} type argument(s), \
         expected at least 2 (business, DTO)"
    )]
    MissingTypeArguments { class: String, found: usize },
}

/// Structured content of one class's report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    pub class: String,
    /// Declared types of the class's own properties
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractSection>,
}

/// Business/DTO part of a section, present only for generic bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSection {
    pub business: String,
    pub dto: String,
    /// Method names of abstract type arguments
    pub operations: Vec<String>,
    /// Property names of concrete type arguments
    pub fields: Vec<String>,
}

/// Classify a single class into its report section.
pub fn classify(class: &ClassSymbol) -> Result<ClassSection, ReportError> {
    let properties = class
        .owned_properties
        .iter()
        .map(|p| p.declared_type.clone())
        .collect();

    let contract = match class.generic_base() {
        Some(base) => Some(classify_contract(&class.name, &base.type_arguments)?),
        None => None,
    };

    Ok(ClassSection {
        class: class.name.clone(),
        properties,
        contract,
    })
}

fn classify_contract(class: &str, args: &[TypeArgSymbol]) -> Result<ContractSection, ReportError> {
    let (business, dto) = match args {
        [business, dto, ..] => (business.name.clone(), dto.name.clone()),
        _ => {
            return Err(ReportError::MissingTypeArguments {
                class: class.to_string(),
                found: args.len(),
            })
        }
    };

    // Memberless arguments (primitives, external types) never reach a table.
    let auxiliary: Vec<&TypeArgSymbol> = args.iter().filter(|t| !t.members.is_empty()).collect();

    Ok(ContractSection {
        business,
        dto,
        operations: collect_members(&auxiliary, true, MemberKind::Method),
        fields: collect_members(&auxiliary, false, MemberKind::Property),
    })
}

/// Abstractness picks which member kind is extracted, not whether an
/// argument participates.
fn collect_members(args: &[&TypeArgSymbol], is_abstract: bool, kind: MemberKind) -> Vec<String> {
    args.iter()
        .filter(|t| t.is_abstract == is_abstract)
        .flat_map(|t| t.member_names(kind))
        .map(str::to_string)
        .collect()
}

/// Classify every class, preserving input order.
pub fn build_sections(classes: &[ClassSymbol]) -> Result<Vec<ClassSection>, ReportError> {
    classes.iter().map(classify).collect()
}

/// Build the full textual report for `classes`.
///
/// An empty input produces an empty report. Fails on the first class whose
/// generic base has fewer than two type arguments.
pub fn build_report(classes: &[ClassSymbol], markup: &Markup) -> Result<String, ReportError> {
    let sections = build_sections(classes)?;
    Ok(markup.render(&sections))
}
