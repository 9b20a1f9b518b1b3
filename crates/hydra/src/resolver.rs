//! Operation resolution
//!
//! A query names the constraints an operation has to satisfy. Unspecified
//! (or empty) fields are wildcards. An operation matches when every specified
//! field is declared on it with exactly the same value. The first matching
//! operation in declaration order wins.

use std::fmt;

use tracing::{debug, trace};

use crate::model::{MethodKind, OperationDescriptor, ResourceDescriptor, SemanticType};
use crate::{HydraError, Result};

/// Constraints for picking an operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationQuery {
    pub method: Option<MethodKind>,
    pub operation_type: Option<SemanticType>,
    pub input_type: Option<SemanticType>,
    pub output_type: Option<SemanticType>,
}

impl OperationQuery {
    /// Query that matches any operation
    pub fn any() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: MethodKind) -> Self {
        self.method = Some(method);
        self
    }

    pub fn operation_type(mut self, ty: SemanticType) -> Self {
        self.operation_type = Some(ty);
        self
    }

    pub fn input_type(mut self, ty: SemanticType) -> Self {
        self.input_type = Some(ty);
        self
    }

    pub fn output_type(mut self, ty: SemanticType) -> Self {
        self.output_type = Some(ty);
        self
    }

    /// Whether `operation` satisfies every specified field
    pub fn matches(&self, operation: &OperationDescriptor) -> bool {
        if let Some(method) = self.method {
            if operation.method != method {
                return false;
            }
        }

        constraint_holds(&self.operation_type, &operation.operation_type)
            && constraint_holds(&self.input_type, &operation.expects)
            && constraint_holds(&self.output_type, &operation.returns)
    }
}

fn constraint_holds(wanted: &Option<SemanticType>, declared: &Option<SemanticType>) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => declared.as_ref() == Some(wanted),
        _ => true,
    }
}

impl fmt::Display for OperationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(method) = self.method {
            parts.push(format!("method={}", method));
        }
        if let Some(ty) = self.operation_type.as_ref().filter(|t| !t.is_empty()) {
            parts.push(format!("operation_type={}", ty));
        }
        if let Some(ty) = self.input_type.as_ref().filter(|t| !t.is_empty()) {
            parts.push(format!("input_type={}", ty));
        }
        if let Some(ty) = self.output_type.as_ref().filter(|t| !t.is_empty()) {
            parts.push(format!("output_type={}", ty));
        }

        if parts.is_empty() {
            f.write_str("{any}")
        } else {
            write!(f, "{{{}}}", parts.join(", "))
        }
    }
}

/// Pick the first operation on `descriptor` that satisfies `query`
pub fn resolve<'a>(
    descriptor: &'a ResourceDescriptor,
    query: &OperationQuery,
) -> Result<&'a OperationDescriptor> {
    trace!(
        "◆ RESOLVING {} AGAINST {} OPERATIONS ON <{}>",
        query,
        descriptor.operations().len(),
        descriptor.iri()
    );

    let operation = descriptor
        .operations()
        .iter()
        .find(|op| query.matches(op))
        .ok_or_else(|| HydraError::NoMatchingOperation {
            resource: descriptor.iri().to_string(),
            query: query.clone(),
        })?;

    debug!(
        "◆ RESOLVED {} ON <{}> TO {}",
        query,
        descriptor.iri(),
        operation.method.verb()
    );
    Ok(operation)
}

impl ResourceDescriptor {
    /// See [`resolve`]
    pub fn resolve(&self, query: &OperationQuery) -> Result<&OperationDescriptor> {
        resolve(self, query)
    }
}
