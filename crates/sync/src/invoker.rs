//! Remote invocation of resolved operations

use std::sync::Arc;

use flock_hydra::{HttpRequest, HypermediaClient, OperationDescriptor, RawResponse};
use tracing::{debug, trace};

use crate::codec::EncodedEntity;
use crate::error::{Result, SyncError};

/// Statuses accepted by [`RemoteInvoker::invoke`]
pub const ACCEPTED_STATUSES: [u16; 2] = [200, 201];

/// Validated answer to an invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub status: u16,
    pub body: EncodedEntity,
    /// Where the created or updated resource lives, when advertised
    pub location: Option<String>,
}

/// Executes resolved operations through a [`HypermediaClient`]
#[derive(Clone)]
pub struct RemoteInvoker {
    client: Arc<dyn HypermediaClient>,
}

impl RemoteInvoker {
    pub fn new(client: Arc<dyn HypermediaClient>) -> Self {
        Self { client }
    }

    /// Send `operation` to `target` without judging the status
    pub async fn exchange(
        &self,
        target: &str,
        operation: &OperationDescriptor,
        body: Option<EncodedEntity>,
    ) -> Result<RawResponse> {
        if body.is_none() {
            if let Some(expected) = &operation.expects {
                return Err(SyncError::CallerContractViolation(format!(
                    "{} <{}> expects {} but no body was supplied",
                    operation.method.verb(),
                    target,
                    expected
                )));
            }
        }

        let mut request = HttpRequest::new(operation.method, target);
        match body {
            Some(body) if operation.method.carries_body() => {
                request = request.with_body(body.into_bytes());
            }
            Some(_) => {
                debug!(
                    "◆ {} CARRIES NO BODY, PAYLOAD DROPPED",
                    operation.method.verb()
                );
            }
            None => {}
        }

        trace!("◆ INVOKING {} <{}>", operation.method, target);
        Ok(self.client.exchange(request).await?)
    }

    /// Send `operation` to `target`; only 200 and 201 count as success
    pub async fn invoke(
        &self,
        target: &str,
        operation: &OperationDescriptor,
        body: Option<EncodedEntity>,
    ) -> Result<Invocation> {
        let response = self.exchange(target, operation, body).await?;

        if !ACCEPTED_STATUSES.contains(&response.status) {
            return Err(SyncError::ProtocolStatus {
                status: response.status,
                reason: response.reason,
            });
        }

        Ok(Invocation {
            status: response.status,
            body: EncodedEntity::from(response.body),
            location: response.location,
        })
    }
}
