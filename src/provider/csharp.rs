//! C# symbol provider using tree-sitter.
//!
//! Resolution happens in two passes:
//! 1. every source unit is parsed in parallel into plain type declarations
//! 2. declarations are merged into a name index, which resolves each class's
//!    base type and the abstractness and members of its type arguments
//!
//! Types not declared in the project (primitives, framework types) resolve
//! to memberless, non-abstract arguments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use super::{collect_source_units, find_project_dir, ProviderError, SymbolProvider};
use crate::config::Config;
use crate::model::{
    BaseTypeRef, ClassSymbol, MemberInfo, MemberKind, PropertyInfo, TypeArgSymbol,
};

/// Tree-sitter query for type declarations, nested ones included.
///
/// Captures:
/// - `class_name` / `class`: classes (the only declarations reported)
/// - `interface_name` / `interface`: interfaces (always abstract)
/// - `struct_name` / `struct`, `record_name` / `record`: other type
///   arguments that may carry properties
const DECLARATION_QUERY: &str = r#"
(class_declaration
  name: (identifier) @class_name
) @class

(interface_declaration
  name: (identifier) @interface_name
) @interface

(struct_declaration
  name: (identifier) @struct_name
) @struct

(record_declaration
  name: (identifier) @record_name
) @record
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Class,
    Interface,
    Struct,
    Record,
}

/// A type declaration extracted from one source unit.
#[derive(Debug, Clone)]
struct TypeDecl {
    name: String,
    kind: DeclKind,
    is_abstract: bool,
    members: Vec<MemberInfo>,
    properties: Vec<PropertyInfo>,
    base: Option<RawBase>,
    start_byte: usize,
}

/// First entry of a base list, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawBase {
    name: String,
    is_generic: bool,
    arguments: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct IndexedType {
    is_interface: bool,
    is_abstract: bool,
    members: Vec<MemberInfo>,
}

/// Project-wide view of declared types, keyed by simple name.
///
/// Partial declarations merge: members accumulate and the first declared
/// base list wins.
#[derive(Debug, Default)]
struct TypeIndex {
    types: HashMap<String, IndexedType>,
    bases: HashMap<String, RawBase>,
}

impl TypeIndex {
    fn build(decls: &[TypeDecl]) -> Self {
        let mut index = TypeIndex::default();

        for decl in decls {
            let entry = index.types.entry(decl.name.clone()).or_default();
            entry.is_interface |= decl.kind == DeclKind::Interface;
            entry.is_abstract |= decl.is_abstract;
            entry.members.extend(decl.members.iter().cloned());

            if decl.kind == DeclKind::Class {
                if let Some(base) = &decl.base {
                    index
                        .bases
                        .entry(decl.name.clone())
                        .or_insert_with(|| base.clone());
                }
            }
        }

        index
    }

    fn is_interface(&self, name: &str) -> bool {
        match self.types.get(name) {
            Some(t) => t.is_interface,
            None => looks_like_interface(name),
        }
    }

    fn resolve_base(&self, class: &TypeDecl) -> Option<BaseTypeRef> {
        let raw = class.base.as_ref().or_else(|| self.bases.get(&class.name))?;

        // `class Foo : IBar` implements an interface; the base stays implicit.
        if self.is_interface(&raw.name) {
            return None;
        }

        if !raw.is_generic {
            return Some(BaseTypeRef::plain());
        }

        if raw.arguments.len() < 2 {
            tracing::debug!(
                "{}: base {} has {} type argument(s), treating as non-generic",
                class.name,
                raw.name,
                raw.arguments.len()
            );
            return Some(BaseTypeRef::plain());
        }

        Some(BaseTypeRef::generic(
            raw.arguments.iter().map(|a| self.type_argument(a)).collect(),
        ))
    }

    fn type_argument(&self, name: &str) -> TypeArgSymbol {
        match self.types.get(name) {
            Some(t) => TypeArgSymbol {
                name: name.to_string(),
                is_abstract: t.is_abstract,
                members: t.members.clone(),
            },
            None => TypeArgSymbol::new(name, false),
        }
    }
}

/// `IFoo` naming convention for interfaces declared outside the project.
fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('I'), Some(second)) if second.is_ascii_uppercase()
    )
}

/// Symbol provider for C# source trees.
pub struct CSharpProvider {
    root: PathBuf,
    config: Config,
    language: Language,
    query: OnceCell<Query>,
}

impl CSharpProvider {
    /// Create a provider rooted at `root` (a solution or project directory).
    pub fn new<P: AsRef<Path>>(root: P, config: Config) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
            language: tree_sitter_c_sharp::LANGUAGE.into(),
            query: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve classes from in-memory source units, in the given order.
    pub fn resolve_sources(&self, sources: &[&str]) -> anyhow::Result<Vec<ClassSymbol>> {
        let mut decls = Vec::new();
        for source in sources {
            decls.extend(self.parse_source(source.as_bytes())?);
        }
        Ok(resolve(&decls))
    }

    fn query(&self) -> anyhow::Result<&Query> {
        self.query
            .get_or_try_init(|| Query::new(&self.language, DECLARATION_QUERY).map_err(Into::into))
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn parse_file(&self, path: &Path) -> anyhow::Result<Vec<TypeDecl>> {
        let source = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        self.parse_source(&source)
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))
    }

    fn parse_source(&self, source: &[u8]) -> anyhow::Result<Vec<TypeDecl>> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source"))?;

        let query = self.query()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, tree.root_node(), source);

        let mut decls = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut decl = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "class_name" | "interface_name" | "struct_name" | "record_name" => {
                        name = node_text(capture.node, source).to_string();
                    }
                    "class" => decl = Some((DeclKind::Class, capture.node)),
                    "interface" => decl = Some((DeclKind::Interface, capture.node)),
                    "struct" => decl = Some((DeclKind::Struct, capture.node)),
                    "record" => decl = Some((DeclKind::Record, capture.node)),
                    _ => {}
                }
            }

            if name.is_empty() {
                continue;
            }
            if let Some((kind, node)) = decl {
                decls.push(extract_declaration(node, name, kind, source));
            }
        }

        decls.sort_by_key(|d| d.start_byte);
        Ok(decls)
    }
}

impl SymbolProvider for CSharpProvider {
    fn list_classes(&self, project: &str) -> Result<Vec<ClassSymbol>, ProviderError> {
        self.query()
            .map_err(|e| ProviderError::Parser(e.to_string()))?;

        let project_dir = find_project_dir(&self.root, project)?;
        let excluded = self
            .config
            .exclusion_matcher()
            .map_err(|e| ProviderError::Config(e.to_string()))?;
        let files = collect_source_units(&project_dir, &self.config, &excluded)?;

        tracing::info!(
            "resolving {} source units in {}",
            files.len(),
            project_dir.display()
        );

        let results: Vec<_> = files.par_iter().map(|p| self.parse_file(p)).collect();

        let mut decls = Vec::new();
        for result in results {
            match result {
                Ok(file_decls) => decls.extend(file_decls),
                Err(e) => {
                    // Skip the unit; the rest of the project still resolves
                    tracing::warn!("{}", e);
                }
            }
        }

        Ok(resolve(&decls))
    }

    fn name(&self) -> &'static str {
        "csharp"
    }
}

/// Turn every class declaration into a [`ClassSymbol`], in declaration order.
fn resolve(decls: &[TypeDecl]) -> Vec<ClassSymbol> {
    let index = TypeIndex::build(decls);

    decls
        .iter()
        .filter(|d| d.kind == DeclKind::Class)
        .map(|d| ClassSymbol {
            name: d.name.clone(),
            owned_properties: d.properties.clone(),
            base_type: index.resolve_base(d),
        })
        .collect()
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn extract_declaration(node: Node, name: String, kind: DeclKind, source: &[u8]) -> TypeDecl {
    let is_abstract = kind == DeclKind::Interface || has_modifier(node, "abstract", source);

    let mut members = Vec::new();
    let mut properties = Vec::new();

    if kind == DeclKind::Record {
        members.extend(positional_properties(node, source));
    }

    if let Some(body) = node.child_by_field_name("body") {
        collect_members(body, source, &mut members, &mut properties);
    }

    TypeDecl {
        name,
        kind,
        is_abstract,
        members,
        properties,
        base: extract_base(node, source),
        start_byte: node.start_byte(),
    }
}

/// Walk a declaration body. Members under `#if`/`#elif`/`#else` count as
/// declared, whichever branch they sit in.
fn collect_members(
    container: Node,
    source: &[u8],
    members: &mut Vec<MemberInfo>,
    properties: &mut Vec<PropertyInfo>,
) {
    let mut cursor = container.walk();
    for child in container.named_children(&mut cursor) {
        if is_preproc_branch(child.kind()) {
            collect_members(child, source, members, properties);
            continue;
        }

        let member_kind = match member_kind(child.kind()) {
            Some(k) => k,
            None => continue,
        };

        if member_kind == MemberKind::Property {
            if let Some(ty) = child.child_by_field_name("type") {
                properties.push(PropertyInfo {
                    declared_type: node_text(ty, source).trim().to_string(),
                });
            }
        }

        if let Some(member_name) = member_name(child, source) {
            members.push(MemberInfo {
                name: member_name,
                kind: member_kind,
            });
        }
    }
}

fn is_preproc_branch(kind: &str) -> bool {
    matches!(kind, "preproc_if" | "preproc_elif" | "preproc_else")
}

fn has_modifier(node: Node, modifier: &str, source: &[u8]) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| c.kind() == "modifier" && node_text(c, source) == modifier);
    found
}

fn member_kind(kind: &str) -> Option<MemberKind> {
    match kind {
        "method_declaration" => Some(MemberKind::Method),
        "property_declaration" => Some(MemberKind::Property),
        k if k.ends_with("_declaration") => Some(MemberKind::Other),
        _ => None,
    }
}

fn member_name(node: Node, source: &[u8]) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }

    // Fields and events: `int a, b;` names its first declarator
    let declarator = first_descendant(node, "variable_declarator")?;
    let name = declarator.child_by_field_name("name").or_else(|| {
        let mut cursor = declarator.walk();
        let first = declarator
            .named_children(&mut cursor)
            .find(|c| c.kind() == "identifier");
        first
    })?;
    Some(node_text(name, source).to_string())
}

fn first_descendant<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
    for child in children {
        if child.kind() == kind {
            return Some(child);
        }
        if let Some(found) = first_descendant(child, kind) {
            return Some(found);
        }
    }
    None
}

/// `record Money(decimal Amount, string Currency);` declares properties.
fn positional_properties(node: Node, source: &[u8]) -> Vec<MemberInfo> {
    let mut cursor = node.walk();
    let params = match node
        .children(&mut cursor)
        .find(|c| c.kind() == "parameter_list")
    {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut cursor = params.walk();
    let names = params
        .named_children(&mut cursor)
        .filter(|p| p.kind() == "parameter")
        .filter_map(|p| p.child_by_field_name("name"))
        .map(|n| MemberInfo {
            name: node_text(n, source).to_string(),
            kind: MemberKind::Property,
        })
        .collect();
    names
}

fn extract_base(node: Node, source: &[u8]) -> Option<RawBase> {
    let mut cursor = node.walk();
    let base_list = node.children(&mut cursor).find(|c| c.kind() == "base_list")?;

    let mut cursor = base_list.walk();
    let first = base_list
        .named_children(&mut cursor)
        .find(|c| !matches!(c.kind(), "argument_list" | "comment"))?;

    Some(raw_base(first, source))
}

fn raw_base(node: Node, source: &[u8]) -> RawBase {
    match node.kind() {
        "generic_name" => RawBase {
            name: simple_name(node, source),
            is_generic: true,
            arguments: type_arguments(node, source),
        },
        "qualified_name" | "alias_qualified_name" => match rightmost_name(node) {
            Some(inner) => raw_base(inner, source),
            None => RawBase {
                name: simple_name(node, source),
                is_generic: false,
                arguments: Vec::new(),
            },
        },
        _ => RawBase {
            name: simple_name(node, source),
            is_generic: false,
            arguments: Vec::new(),
        },
    }
}

fn type_arguments(generic: Node, source: &[u8]) -> Vec<String> {
    let mut cursor = generic.walk();
    let list = match generic
        .children(&mut cursor)
        .find(|c| c.kind() == "type_argument_list")
    {
        Some(l) => l,
        None => return Vec::new(),
    };

    let mut cursor = list.walk();
    let args = list
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .map(|c| simple_name(c, source))
        .collect();
    args
}

/// Name without namespace qualification or generic arguments:
/// `Shop.Models.Page<OrderDto>` becomes `Page`.
fn simple_name(node: Node, source: &[u8]) -> String {
    match node.kind() {
        "generic_name" => {
            let mut cursor = node.walk();
            let ident = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier");
            match ident {
                Some(i) => node_text(i, source).to_string(),
                None => node_text(node, source)
                    .split('<')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_string(),
            }
        }
        "qualified_name" | "alias_qualified_name" => match rightmost_name(node) {
            Some(inner) => simple_name(inner, source),
            None => node_text(node, source).trim().to_string(),
        },
        _ => node_text(node, source).trim().to_string(),
    }
}

fn rightmost_name(node: Node) -> Option<Node> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(name);
    }
    let mut cursor = node.walk();
    let last = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .last();
    last.filter(|n| n.id() != node.id())
}
