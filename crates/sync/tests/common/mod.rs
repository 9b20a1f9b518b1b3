//! Scripted hypermedia client and fixtures for sync tests
#![allow(dead_code)]

use async_trait::async_trait;
use flock_config::Config;
use flock_hydra::{
    HttpRequest, HydraError, HypermediaClient, MethodKind, OperationDescriptor, RawResponse,
    ResourceDescriptor, Result,
};
use flock_sync::{encode_value, Entity, SyncController, Vocabulary};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// What the next exchange answers
pub enum Reply {
    Respond(RawResponse),
    Refuse,
}

/// In-memory remote: fixed descriptors, queued replies, recorded requests
#[derive(Default)]
pub struct ScriptedClient {
    resources: Mutex<HashMap<String, ResourceDescriptor>>,
    unreachable: Mutex<HashSet<String>>,
    describe_failures: Mutex<HashMap<String, u16>>,
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resource(&self, descriptor: ResourceDescriptor) {
        self.resources
            .lock()
            .unwrap()
            .insert(descriptor.iri().to_string(), descriptor);
    }

    /// Refuse every connection to `iri`
    pub fn make_unreachable(&self, iri: &str) {
        self.unreachable.lock().unwrap().insert(iri.to_string());
    }

    /// Answer `describe(iri)` with an HTTP error status
    pub fn fail_describe(&self, iri: &str, status: u16) {
        self.describe_failures
            .lock()
            .unwrap()
            .insert(iri.to_string(), status);
    }

    pub fn clear_describe_failure(&self, iri: &str) {
        self.describe_failures.lock().unwrap().remove(iri);
    }

    pub fn reply(&self, response: RawResponse) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Respond(response));
    }

    pub fn refuse_next(&self) {
        self.replies.lock().unwrap().push_back(Reply::Refuse);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl HypermediaClient for ScriptedClient {
    async fn describe(&self, iri: &str) -> Result<ResourceDescriptor> {
        if self.unreachable.lock().unwrap().contains(iri) {
            return Err(HydraError::ConnectionUnavailable(iri.to_string()));
        }
        if let Some(status) = self.describe_failures.lock().unwrap().get(iri) {
            return Err(HydraError::DescribeStatus {
                iri: iri.to_string(),
                status: *status,
            });
        }
        self.resources
            .lock()
            .unwrap()
            .get(iri)
            .cloned()
            .ok_or_else(|| HydraError::DescribeStatus {
                iri: iri.to_string(),
                status: 404,
            })
    }

    async fn exchange(&self, request: HttpRequest) -> Result<RawResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        if self.unreachable.lock().unwrap().contains(&url) {
            return Err(HydraError::ConnectionUnavailable(url));
        }

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Refuse) => Err(HydraError::ConnectionUnavailable(url)),
            None => panic!("unscripted request to {}", url),
        }
    }
}

// ========== Fixtures ==========

pub fn config() -> Config {
    Config::default()
}

pub fn vocab() -> Vocabulary {
    Vocabulary::from_config(&config())
}

/// Drone server resource: reads and updates for Drone and Datastream
pub fn drone_resource() -> ResourceDescriptor {
    let vocab = vocab();
    ResourceDescriptor::new(
        config().drone.iri,
        vec![
            OperationDescriptor::new(MethodKind::Retrieve).returns(vocab.drone.term("Drone")),
            OperationDescriptor::new(MethodKind::Update)
                .expects(vocab.drone.term("Drone"))
                .operation_type(vocab.update_action()),
            OperationDescriptor::new(MethodKind::Retrieve)
                .returns(vocab.drone.term("Datastream")),
            OperationDescriptor::new(MethodKind::Update)
                .expects(vocab.drone.term("Datastream"))
                .operation_type(vocab.update_action()),
        ],
    )
}

/// Controller location resource
pub fn controller_resource() -> ResourceDescriptor {
    let vocab = vocab();
    ResourceDescriptor::new(
        config().controller.iri,
        vec![OperationDescriptor::new(MethodKind::Retrieve).returns(vocab.central.term("Location"))],
    )
}

/// Drone entry in the controller's collection
pub fn controller_entry(drone_id: i64) -> ResourceDescriptor {
    let vocab = vocab();
    ResourceDescriptor::new(
        config().controller_drone_iri(drone_id),
        vec![
            OperationDescriptor::new(MethodKind::Retrieve).returns(vocab.central.term("Drone")),
            OperationDescriptor::new(MethodKind::Update)
                .expects(vocab.central.term("Drone"))
                .operation_type(vocab.update_action()),
        ],
    )
}

/// 200 answer carrying `entity` with server-side metadata
pub fn entity_response<T: Entity>(entity: &T, id: &str) -> RawResponse {
    let mut value = encode_value(entity).unwrap();
    let object = value.as_object_mut().unwrap();
    object.insert("@id".to_string(), id.into());
    object.insert(
        "@context".to_string(),
        format!("/api/contexts/{}.jsonld", T::TYPE_TERM).into(),
    );
    RawResponse::new(200, serde_json::to_vec(&value).unwrap()).with_reason("OK")
}

pub fn status_response(status: u16, reason: &str) -> RawResponse {
    RawResponse::new(status, Vec::new()).with_reason(reason)
}

/// Controller over a scripted client with both remotes linked
pub fn linked(client: &Arc<ScriptedClient>) -> SyncController {
    let dyn_client: Arc<dyn HypermediaClient> = client.clone();
    SyncController::new(
        dyn_client,
        config(),
        drone_resource(),
        Some(controller_resource()),
    )
}

/// Controller whose central controller was unreachable at startup
pub fn unlinked(client: &Arc<ScriptedClient>) -> SyncController {
    let dyn_client: Arc<dyn HypermediaClient> = client.clone();
    SyncController::new(dyn_client, config(), drone_resource(), None)
}
