//! Resolved type-graph snapshot consumed by the report builder.
//!
//! Symbol providers fill these structures once per run. Nothing mutates
//! them afterwards; the report builder only reads.

use serde::{Deserialize, Serialize};

/// A declared class together with its resolved base type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassSymbol {
    /// Simple class name (no namespace, no generic parameters)
    pub name: String,
    /// Properties declared directly on the class, in declaration order
    #[serde(default)]
    pub owned_properties: Vec<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<BaseTypeRef>,
}

impl ClassSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owned_properties: Vec::new(),
            base_type: None,
        }
    }

    pub fn with_property(mut self, declared_type: impl Into<String>) -> Self {
        self.owned_properties.push(PropertyInfo {
            declared_type: declared_type.into(),
        });
        self
    }

    pub fn with_base(mut self, base: BaseTypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    /// The base type, if it is generic.
    pub fn generic_base(&self) -> Option<&BaseTypeRef> {
        self.base_type.as_ref().filter(|b| b.is_generic)
    }
}

/// A property declaration as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PropertyInfo {
    pub declared_type: String,
}

/// The base type of a class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct BaseTypeRef {
    #[serde(default)]
    pub is_generic: bool,
    /// Type arguments in the order declared on the base type
    #[serde(default)]
    pub type_arguments: Vec<TypeArgSymbol>,
}

impl BaseTypeRef {
    pub fn generic(type_arguments: Vec<TypeArgSymbol>) -> Self {
        Self {
            is_generic: true,
            type_arguments,
        }
    }

    pub fn plain() -> Self {
        Self::default()
    }
}

/// One type argument bound on a generic base type.
///
/// Position 0 is the business contract, position 1 the DTO.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeArgSymbol {
    pub name: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub members: Vec<MemberInfo>,
}

impl TypeArgSymbol {
    pub fn new(name: impl Into<String>, is_abstract: bool) -> Self {
        Self {
            name: name.into(),
            is_abstract,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, kind: MemberKind) -> Self {
        self.members.push(MemberInfo {
            name: name.into(),
            kind,
        });
        self
    }

    /// Names of the members of `kind`, in declaration order.
    pub fn member_names(&self, kind: MemberKind) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(move |m| m.kind == kind)
            .map(|m| m.name.as_str())
    }
}

/// A member declared on a type argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
}

/// Kind of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Other,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKind::Method => write!(f, "method"),
            MemberKind::Property => write!(f, "property"),
            MemberKind::Other => write!(f, "other"),
        }
    }
}
