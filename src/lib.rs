//! Apiskel - API skeleton reporter.
//!
//! Apiskel documents codebases where controllers derive from a generic base
//! parameterized by a business contract and a DTO. For each class it reports
//! the class's own properties and, for generic bases, the operations of the
//! business contract and the fields of the DTO.
//!
//! # Architecture
//!
//! - `model`: resolved type-graph snapshot (classes, type arguments, members)
//! - `provider`: symbol providers producing the snapshot (C# via tree-sitter,
//!   serialized snapshots)
//! - `report`: classification and report assembly, plus output writers
//! - `config`: YAML configuration for source discovery
//! - `cli`: command-line entry points
//!
//! # Example
//!
//! ```
//! use apiskel::model::{BaseTypeRef, ClassSymbol, MemberKind, TypeArgSymbol};
//! use apiskel::report::{build_report, Markup};
//!
//! let class = ClassSymbol::new("OrdersController").with_base(BaseTypeRef::generic(vec![
//!     TypeArgSymbol::new("IOrderBusiness", true).with_member("Get", MemberKind::Method),
//!     TypeArgSymbol::new("OrderDto", false).with_member("Id", MemberKind::Property),
//! ]));
//!
//! let report = build_report(&[class], &Markup::html()).unwrap();
//! assert!(report.contains("\"OrdersController\" API with \"IOrderBusiness\" interface"));
//! ```

pub mod cli;
pub mod config;
pub mod model;
pub mod provider;
pub mod report;

pub use config::Config;
pub use model::{BaseTypeRef, ClassSymbol, MemberInfo, MemberKind, PropertyInfo, TypeArgSymbol};
pub use provider::{ProviderError, Snapshot, SnapshotProvider, SymbolProvider};
pub use report::{build_report, build_sections, classify, ClassSection, Markup, ReportError};

#[cfg(feature = "tree-sitter")]
pub use provider::CSharpProvider;
