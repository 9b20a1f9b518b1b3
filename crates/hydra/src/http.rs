//! reqwest-backed hypermedia client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, trace};

use crate::document::parse_descriptor;
use crate::model::{MethodKind, ResourceDescriptor};
use crate::{HttpRequest, HydraError, HypermediaClient, RawResponse, Result};

const JSON_LD: &str = "application/ld+json";
const JSON: &str = "application/json";

/// Hypermedia client over HTTP
///
/// No request timeout is configured: a hung remote blocks the calling flow.
#[derive(Debug, Clone, Default)]
pub struct HttpHypermediaClient {
    client: Client,
}

impl HttpHypermediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn http_method(kind: MethodKind) -> Method {
    match kind {
        MethodKind::Retrieve => Method::GET,
        MethodKind::Create => Method::PUT,
        MethodKind::Update => Method::POST,
        MethodKind::Delete => Method::DELETE,
    }
}

/// Refused or unreachable connections are kept apart from other failures
fn transport_error(url: &str, err: reqwest::Error) -> HydraError {
    if err.is_connect() {
        HydraError::ConnectionUnavailable(url.to_string())
    } else {
        HydraError::Request(err)
    }
}

#[async_trait]
impl HypermediaClient for HttpHypermediaClient {
    async fn describe(&self, iri: &str) -> Result<ResourceDescriptor> {
        trace!("◆ DESCRIBING <{}>", iri);

        let response = self
            .client
            .get(iri)
            .header(ACCEPT, JSON_LD)
            .send()
            .await
            .map_err(|e| transport_error(iri, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HydraError::DescribeStatus {
                iri: iri.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(iri, e))?;
        let document: Value = serde_json::from_slice(&bytes)?;
        let descriptor = parse_descriptor(iri, &document)?;

        debug!(
            "◆ <{}> ADVERTISES {} OPERATIONS",
            iri,
            descriptor.operations().len()
        );
        Ok(descriptor)
    }

    async fn exchange(&self, request: HttpRequest) -> Result<RawResponse> {
        let HttpRequest { method, url, body } = request;
        trace!("◆ {} <{}>", method.verb(), url);

        let mut builder = self
            .client
            .request(http_method(method), &url)
            .header(ACCEPT, JSON_LD);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, JSON).body(body);
        }

        let response = builder.send().await.map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                response
                    .url()
                    .join(value)
                    .map(|joined| joined.to_string())
                    .unwrap_or_else(|_| value.to_string())
            });
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?
            .to_vec();

        debug!("◆ {} <{}> ANSWERED {}", method.verb(), url, status.as_u16());

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
            location,
        })
    }
}
