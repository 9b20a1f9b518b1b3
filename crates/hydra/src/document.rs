//! Resource document parsing
//!
//! Reads the operation list a JSON-LD resource document advertises. Terms are
//! expanded against the document's inline `@context`; remote contexts are not
//! fetched.

use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{MethodKind, OperationDescriptor, ResourceDescriptor, SemanticType};
use crate::{HydraError, Result};

const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";

const OPERATION_KEYS: &[&str] = &[
    "operation",
    "hydra:operation",
    "supportedOperation",
    "hydra:supportedOperation",
    "http://www.w3.org/ns/hydra/core#operation",
    "http://www.w3.org/ns/hydra/core#supportedOperation",
];

/// Types that only say "this is an operation"
const GENERIC_OPERATION_TYPES: &[&str] = &["Operation", "hydra:Operation"];

/// Types that mean "no payload"
const NOTHING_TYPES: &[&str] = &[
    "null",
    "owl:Nothing",
    "http://www.w3.org/2002/07/owl#Nothing",
];

/// Build a descriptor from the resource document served at `iri`
pub fn parse_descriptor(iri: &str, document: &Value) -> Result<ResourceDescriptor> {
    let object = document
        .as_object()
        .ok_or_else(|| invalid(iri, "document is not an object"))?;
    let context = inline_context(object);

    let listed = OPERATION_KEYS.iter().find_map(|key| object.get(*key));
    let entries: Vec<&Value> = match listed {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        Some(_) => return Err(invalid(iri, "operation list is neither array nor object")),
    };

    let mut operations = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry
            .as_object()
            .ok_or_else(|| invalid(iri, "operation entry is not an object"))?;
        if let Some(operation) = parse_operation(iri, entry, &context)? {
            operations.push(operation);
        }
    }

    Ok(ResourceDescriptor::new(iri, operations))
}

fn parse_operation(
    iri: &str,
    entry: &Map<String, Value>,
    context: &Map<String, Value>,
) -> Result<Option<OperationDescriptor>> {
    let verb = field(entry, "method")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(iri, "operation without method"))?;

    let Some(method) = MethodKind::from_verb(verb) else {
        warn!("◆ <{}> ADVERTISES UNSUPPORTED METHOD {}, SKIPPED", iri, verb);
        return Ok(None);
    };

    let mut operation = OperationDescriptor::new(method);
    operation.expects = field(entry, "expects").and_then(|v| type_reference(v, context));
    operation.returns = field(entry, "returns").and_then(|v| type_reference(v, context));
    operation.operation_type = action_type(entry.get("@type"), context);
    Ok(Some(operation))
}

/// Look up a Hydra property under its bare, prefixed or absolute key
fn field<'a>(entry: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    entry
        .get(name)
        .or_else(|| entry.get(&format!("hydra:{}", name)))
        .or_else(|| entry.get(&format!("{}{}", HYDRA, name)))
}

fn type_reference(value: &Value, context: &Map<String, Value>) -> Option<SemanticType> {
    let term = match value {
        Value::String(term) => term.as_str(),
        Value::Object(node) => node.get("@id")?.as_str()?,
        _ => return None,
    };
    if term.is_empty() || NOTHING_TYPES.contains(&term) {
        return None;
    }

    let expanded = expand(term, context);
    if NOTHING_TYPES.contains(&expanded.as_str()) {
        return None;
    }
    Some(SemanticType::new(expanded))
}

fn action_type(value: Option<&Value>, context: &Map<String, Value>) -> Option<SemanticType> {
    let candidates: Vec<&str> = match value? {
        Value::String(ty) => vec![ty.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };

    let generic = format!("{}Operation", HYDRA);
    candidates
        .into_iter()
        .filter(|ty| !GENERIC_OPERATION_TYPES.contains(ty))
        .map(|ty| expand(ty, context))
        .find(|ty| *ty != generic)
        .map(SemanticType::new)
}

/// Merge the inline parts of `@context`
fn inline_context(document: &Map<String, Value>) -> Map<String, Value> {
    match document.get("@context") {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Array(parts)) => {
            let mut merged = Map::new();
            for part in parts {
                if let Value::Object(map) = part {
                    merged.extend(map.clone());
                }
            }
            merged
        }
        _ => Map::new(),
    }
}

/// Expand a compact IRI or term against an inline context
pub fn expand(term: &str, context: &Map<String, Value>) -> String {
    if is_absolute(term) {
        return term.to_string();
    }

    if let Some((prefix, suffix)) = term.split_once(':') {
        return match context_iri(context.get(prefix)) {
            Some(base) => format!("{}{}", base, suffix),
            None => term.to_string(),
        };
    }

    if let Some(mapped) = context_iri(context.get(term)) {
        if is_absolute(mapped) {
            return mapped.to_string();
        }
        if let Some((prefix, suffix)) = mapped.split_once(':') {
            if let Some(base) = context_iri(context.get(prefix)) {
                return format!("{}{}", base, suffix);
            }
        }
    }

    match context.get("@vocab").and_then(Value::as_str) {
        Some(vocab) => format!("{}{}", vocab, term),
        None => term.to_string(),
    }
}

fn is_absolute(term: &str) -> bool {
    term.contains("://") || term.starts_with("urn:")
}

fn context_iri(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(iri) => Some(iri.as_str()),
        Value::Object(definition) => definition.get("@id")?.as_str(),
        _ => None,
    }
}

fn invalid(iri: &str, reason: &str) -> HydraError {
    HydraError::InvalidDocument {
        iri: iri.to_string(),
        reason: reason.to_string(),
    }
}
