//! Hydra hypermedia layer
//!
//! Resource descriptors advertise the operations a remote resource supports.
//! Operations are picked by semantic type, never by hardcoded URL or verb.

use async_trait::async_trait;
use thiserror::Error;

pub mod document;
pub mod http;
pub mod model;
pub mod resolver;

pub use document::parse_descriptor;
pub use http::HttpHypermediaClient;
pub use model::{MethodKind, Namespace, OperationDescriptor, ResourceDescriptor, SemanticType};
pub use resolver::{resolve, OperationQuery};

/// Hypermedia client errors
#[derive(Error, Debug)]
pub enum HydraError {
    #[error("LINK DOWN: <{0}> UNREACHABLE")]
    ConnectionUnavailable(String),

    #[error("REQUEST FAILED: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MALFORMED JSON-LD: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MALFORMED RESOURCE DOCUMENT <{iri}>: {reason}")]
    InvalidDocument { iri: String, reason: String },

    #[error("RESOURCE <{iri}> ANSWERED {status}")]
    DescribeStatus { iri: String, status: u16 },

    #[error("NO OPERATION ON <{resource}> MATCHES {query}")]
    NoMatchingOperation {
        resource: String,
        query: OperationQuery,
    },
}

pub type Result<T> = std::result::Result<T, HydraError>;

/// Outgoing HTTP exchange for a resolved operation
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: MethodKind,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: MethodKind, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw answer from a remote, before any status validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
    pub location: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: String::new(),
            body: body.into(),
            location: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Narrow interface to the remote hypermedia services
#[async_trait]
pub trait HypermediaClient: Send + Sync {
    /// Fetch the resource at `iri` and the operations it advertises
    async fn describe(&self, iri: &str) -> Result<ResourceDescriptor>;

    /// Perform one HTTP exchange
    async fn exchange(&self, request: HttpRequest) -> Result<RawResponse>;
}
