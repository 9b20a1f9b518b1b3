//! Resource and operation descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vocabulary-qualified type IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticType(String);

impl SemanticType {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Local name after the namespace separator
    pub fn term(&self) -> &str {
        self.0
            .rsplit(|c: char| c == '#' || c == '/' || c == ':')
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for SemanticType {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// Base IRI that vocabulary terms hang off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    base: String,
}

impl Namespace {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn term(&self, name: &str) -> SemanticType {
        SemanticType::new(format!("{}{}", self.base, name))
    }
}

/// What an operation does to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Retrieve,
    Create,
    Update,
    Delete,
}

impl MethodKind {
    /// Hydra servers here create with PUT and update with POST
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Retrieve),
            "PUT" => Some(Self::Create),
            "POST" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Retrieve => "GET",
            Self::Create => "PUT",
            Self::Update => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the transport sends a request body for this kind
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Retrieve => "Retrieve",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        };
        f.write_str(name)
    }
}

/// Declared capability of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub method: MethodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expects: Option<SemanticType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<SemanticType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<SemanticType>,
}

impl OperationDescriptor {
    pub fn new(method: MethodKind) -> Self {
        Self {
            method,
            expects: None,
            returns: None,
            operation_type: None,
        }
    }

    pub fn expects(mut self, ty: SemanticType) -> Self {
        self.expects = Some(ty);
        self
    }

    pub fn returns(mut self, ty: SemanticType) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn operation_type(mut self, ty: SemanticType) -> Self {
        self.operation_type = Some(ty);
        self
    }
}

/// Remote resource plus the operations it advertises, in declared order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    iri: String,
    operations: Vec<OperationDescriptor>,
}

impl ResourceDescriptor {
    pub fn new(iri: impl Into<String>, operations: Vec<OperationDescriptor>) -> Self {
        Self {
            iri: iri.into(),
            operations,
        }
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn operations(&self) -> &[OperationDescriptor] {
        &self.operations
    }
}
