//! JSON-LD entity codec
//!
//! Decoding strips the wire metadata (`@id`, `@context`, `@type`) so it never
//! reaches a domain record. Encoding re-attaches the type tag and leaves the
//! identifier to the remote.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

const ID_KEY: &str = "@id";
const CONTEXT_KEY: &str = "@context";
const TYPE_KEY: &str = "@type";

/// Codec failures
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("MALFORMED DOCUMENT: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DOCUMENT IS NOT A JSON OBJECT")]
    NotAnObject,

    #[error("EXPECTED @type {expected}, FOUND {found}")]
    UnexpectedType { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// A record that travels as a typed JSON-LD document
pub trait Entity: Serialize + DeserializeOwned {
    /// Value of the top-level `@type` tag
    const TYPE_TERM: &'static str;

    /// Embedded members that carry their own `@type`, as (key, term)
    const NESTED: &'static [(&'static str, &'static str)] = &[];
}

/// Serialized document bytes
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EncodedEntity(Vec<u8>);

impl EncodedEntity {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for EncodedEntity {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for EncodedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedEntity({})", String::from_utf8_lossy(&self.0))
    }
}

/// Serialize `entity` with its type tags
pub fn encode<T: Entity>(entity: &T) -> Result<EncodedEntity> {
    Ok(EncodedEntity(serde_json::to_vec(&encode_value(entity)?)?))
}

/// Like [`encode`], as a JSON value
pub fn encode_value<T: Entity>(entity: &T) -> Result<Value> {
    let mut value = serde_json::to_value(entity)?;
    let object = value.as_object_mut().ok_or(CodecError::NotAnObject)?;

    object.remove(ID_KEY);
    object.insert(TYPE_KEY.to_string(), Value::String(T::TYPE_TERM.to_string()));
    for (member, term) in T::NESTED {
        if let Some(Value::Object(nested)) = object.get_mut(*member) {
            nested.insert(TYPE_KEY.to_string(), Value::String((*term).to_string()));
        }
    }

    Ok(value)
}

/// Parse a document into `T`, checking its top-level `@type`
pub fn decode<T: Entity>(bytes: &[u8]) -> Result<T> {
    let mut value: Value = serde_json::from_slice(bytes)?;
    let object = value.as_object_mut().ok_or(CodecError::NotAnObject)?;

    if let Some(found) = object.get(TYPE_KEY) {
        if !names_type(found, T::TYPE_TERM) {
            return Err(CodecError::UnexpectedType {
                expected: T::TYPE_TERM.to_string(),
                found: found.to_string(),
            });
        }
    }

    strip_metadata(object);
    for (member, _) in T::NESTED {
        if let Some(Value::Object(nested)) = object.get_mut(*member) {
            strip_metadata(nested);
        }
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse any document into a metadata-free map
pub fn decode_document(bytes: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(mut object) => {
            strip_metadata(&mut object);
            Ok(object)
        }
        _ => Err(CodecError::NotAnObject),
    }
}

fn strip_metadata(object: &mut Map<String, Value>) {
    object.remove(ID_KEY);
    object.remove(CONTEXT_KEY);
    object.remove(TYPE_KEY);
}

/// `@type` names `term` directly or as the local name of an IRI
fn names_type(found: &Value, term: &str) -> bool {
    match found {
        Value::String(ty) => {
            ty == term
                || ty
                    .strip_suffix(term)
                    .map(|prefix| prefix.ends_with(&['#', '/', ':'][..]))
                    .unwrap_or(false)
        }
        Value::Array(types) => types.iter().any(|ty| names_type(ty, term)),
        _ => false,
    }
}
