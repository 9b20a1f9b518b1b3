//! Drone state synchronization
//!
//! Every flow resolves its operation from the resource descriptor, invokes it,
//! and decodes the answer. Read-modify-write flows start from a fresh drone
//! snapshot and refuse updates addressed to another drone.
//!
//! Failure policy per flow:
//!
//! | flow                          | refused connection      | bad status         |
//! |-------------------------------|-------------------------|--------------------|
//! | drone server flows            | `RemoteUnavailable`     | `ProtocolStatus`   |
//! | `fetch_controller_location`   | `"0,0"`                 | `ProtocolStatus`   |
//! | `update_drone_at_controller`  | `NotFound`              | `Failed`           |

use std::fmt;
use std::sync::Arc;

use flock_config::Config;
use flock_hydra::{
    HypermediaClient, MethodKind, Namespace, OperationQuery, ResourceDescriptor, SemanticType,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::canonical;
use crate::codec::{self, EncodedEntity, Entity};
use crate::entities::{ControllerLocation, Datastream, Drone, DroneStateReport, Position};
use crate::error::{Result, SyncError};
use crate::invoker::RemoteInvoker;

pub const DRONE_SERVER: &str = "drone server";
pub const CENTRAL_CONTROLLER: &str = "central controller";

/// Vocabularies the two remotes describe their resources in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub drone: Namespace,
    pub central: Namespace,
    pub schema: Namespace,
}

impl Vocabulary {
    pub fn from_config(config: &Config) -> Self {
        Self {
            drone: Namespace::new(config.drone.namespace.clone()),
            central: Namespace::new(config.controller.namespace.clone()),
            schema: Namespace::new(config.schema_namespace.clone()),
        }
    }

    pub fn update_action(&self) -> SemanticType {
        self.schema.term("UpdateAction")
    }
}

/// Outcome of the best-effort controller update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerUpdate {
    Updated { iri: String },
    Failed { iri: String, status: u16 },
    NotFound { path: String },
}

impl ControllerUpdate {
    /// HTTP-style code of the outcome
    pub fn code(&self) -> u16 {
        match self {
            Self::Updated { .. } => 200,
            Self::Failed { status, .. } => *status,
            Self::NotFound { .. } => 404,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

impl fmt::Display for ControllerUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated { iri } => write!(f, "updated <{}>", iri),
            Self::Failed { iri, .. } => write!(f, "error updating <{}>", iri),
            Self::NotFound { path } => write!(f, "Resource with Id {} not found!", path),
        }
    }
}

/// What `connect` learned about the central controller
#[derive(Debug, Clone)]
enum ControllerLink {
    Linked(ResourceDescriptor),
    Unreachable,
    /// Described with an error other than a refused connection
    Broken(String),
}

/// Keeps the local drone in step with the drone server and the controller
pub struct SyncController {
    client: Arc<dyn HypermediaClient>,
    invoker: RemoteInvoker,
    config: Config,
    vocab: Vocabulary,
    drone_resource: ResourceDescriptor,
    controller: ControllerLink,
}

impl SyncController {
    /// `controller_resource` is `None` when the controller could not be reached
    pub fn new(
        client: Arc<dyn HypermediaClient>,
        config: Config,
        drone_resource: ResourceDescriptor,
        controller_resource: Option<ResourceDescriptor>,
    ) -> Self {
        Self {
            invoker: RemoteInvoker::new(Arc::clone(&client)),
            client,
            vocab: Vocabulary::from_config(&config),
            config,
            drone_resource,
            controller: match controller_resource {
                Some(resource) => ControllerLink::Linked(resource),
                None => ControllerLink::Unreachable,
            },
        }
    }

    /// Describe both configured remotes
    ///
    /// The drone server must answer. Controller failures are kept for the
    /// controller flows and never fail the connection.
    pub async fn connect(client: Arc<dyn HypermediaClient>, config: Config) -> Result<Self> {
        let drone_resource = client
            .describe(&config.drone.iri)
            .await
            .map_err(|e| SyncError::from(e).unavailable_as(DRONE_SERVER))?;

        let controller = match client.describe(&config.controller.iri).await {
            Ok(resource) => ControllerLink::Linked(resource),
            Err(e) => {
                let err = SyncError::from(e);
                warn!("◆ {} NOT LINKED AT STARTUP: {}", CENTRAL_CONTROLLER, err);
                if err.is_unavailable() {
                    ControllerLink::Unreachable
                } else {
                    ControllerLink::Broken(err.to_string())
                }
            }
        };

        info!("◆ LINKED TO <{}>", drone_resource.iri());
        let mut sync = Self::new(client, config, drone_resource, None);
        sync.controller = controller;
        Ok(sync)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn drone_resource(&self) -> &ResourceDescriptor {
        &self.drone_resource
    }

    pub fn controller_resource(&self) -> Option<&ResourceDescriptor> {
        match &self.controller {
            ControllerLink::Linked(resource) => Some(resource),
            _ => None,
        }
    }

    /// Why the controller could not be described, when it answered with an error
    pub fn controller_error(&self) -> Option<&str> {
        match &self.controller {
            ControllerLink::Broken(reason) => Some(reason),
            _ => None,
        }
    }

    // ========== Drone ==========

    /// Current authoritative drone record
    pub async fn fetch_drone(&self) -> Result<Drone> {
        let query = OperationQuery::any()
            .method(MethodKind::Retrieve)
            .output_type(self.vocab.drone.term("Drone"));

        let drone: Drone = self
            .retrieve(&self.drone_resource, &query)
            .await
            .map_err(|e| e.unavailable_as(DRONE_SERVER))?;

        debug!("◆ DRONE {} RETRIEVED", drone.id);
        Ok(drone)
    }

    pub async fn fetch_drone_id(&self) -> Result<i64> {
        Ok(self.fetch_drone().await?.id)
    }

    pub async fn fetch_drone_position(&self) -> Result<Position> {
        Ok(self.fetch_drone().await?.state.position)
    }

    /// Push `drone` to the drone server
    pub async fn update_drone(&self, drone: &Drone) -> Result<ResourceDescriptor> {
        let input_type = self.vocab.drone.term("Drone");
        let resource = self
            .submit(&self.drone_resource, input_type, drone)
            .await
            .map_err(|e| e.unavailable_as(DRONE_SERVER))?;

        info!("◆ DRONE {} UPDATED AT <{}>", drone.id, resource.iri());
        Ok(resource)
    }

    // ========== State ==========

    /// Current state, tagged with the drone id
    pub async fn fetch_state(&self) -> Result<DroneStateReport> {
        let drone = self.fetch_drone().await?;
        Ok(DroneStateReport::new(drone.id, drone.state))
    }

    /// Replace the drone's state, after checking the report addresses it
    pub async fn update_state(&self, report: DroneStateReport) -> Result<ResourceDescriptor> {
        let mut drone = self.fetch_drone().await?;
        check_identity(&drone, report.drone_id)?;

        drone.state = report.into_state();
        let resource = self.update_drone(&drone).await?;
        info!("◆ DRONE {} STATE UPDATED", drone.id);
        Ok(resource)
    }

    // ========== Datastream ==========

    pub async fn fetch_datastream(&self) -> Result<Datastream> {
        let query = OperationQuery::any()
            .method(MethodKind::Retrieve)
            .output_type(self.vocab.drone.term("Datastream"));

        self.retrieve(&self.drone_resource, &query)
            .await
            .map_err(|e| e.unavailable_as(DRONE_SERVER))
    }

    /// Replace the datastream, after checking it addresses the current drone
    pub async fn update_datastream(&self, datastream: &Datastream) -> Result<ResourceDescriptor> {
        let drone = self.fetch_drone().await?;
        check_identity(&drone, datastream.drone_id)?;

        let input_type = self.vocab.drone.term("Datastream");
        let resource = self
            .submit(&self.drone_resource, input_type, datastream)
            .await
            .map_err(|e| e.unavailable_as(DRONE_SERVER))?;

        info!("◆ DATASTREAM FOR DRONE {} UPDATED", drone.id);
        Ok(resource)
    }

    // ========== Central controller ==========

    /// Controller position; advisory, so an unreachable controller yields "0,0"
    ///
    /// A controller that failed to describe at startup is described again
    /// here, and a repeated failure is returned to the caller.
    pub async fn fetch_controller_location(&self) -> Result<Position> {
        let resource = match &self.controller {
            ControllerLink::Linked(resource) => resource.clone(),
            ControllerLink::Unreachable => {
                warn!("◆ {} NOT LINKED, USING DEFAULT LOCATION", CENTRAL_CONTROLLER);
                return Ok(Position::origin());
            }
            ControllerLink::Broken(reason) => {
                debug!("◆ RE-DESCRIBING {} AFTER: {}", CENTRAL_CONTROLLER, reason);
                match self.client.describe(&self.config.controller.iri).await {
                    Ok(resource) => resource,
                    Err(e) => match SyncError::from(e).unavailable_as(CENTRAL_CONTROLLER) {
                        SyncError::RemoteUnavailable(remote) => {
                            warn!("◆ {} UNREACHABLE, USING DEFAULT LOCATION", remote);
                            return Ok(Position::origin());
                        }
                        other => return Err(other),
                    },
                }
            }
        };

        let query = OperationQuery::any()
            .method(MethodKind::Retrieve)
            .output_type(self.vocab.central.term("Location"));

        match self
            .retrieve::<ControllerLocation>(&resource, &query)
            .await
            .map_err(|e| e.unavailable_as(CENTRAL_CONTROLLER))
        {
            Ok(found) => Ok(found.location),
            Err(SyncError::RemoteUnavailable(remote)) => {
                warn!("◆ {} UNREACHABLE, USING DEFAULT LOCATION", remote);
                Ok(Position::origin())
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort push of `drone` to its entry in the controller's collection
    pub async fn update_drone_at_controller(
        &self,
        drone: &Drone,
        drone_id: i64,
    ) -> Result<ControllerUpdate> {
        let path = self.config.controller_drone_path(drone_id);
        let iri = self.config.controller_drone_iri(drone_id);

        let resource = match self.client.describe(&iri).await {
            Ok(resource) => resource,
            Err(e) => {
                warn!("◆ CONTROLLER ENTRY <{}> UNAVAILABLE: {}", iri, e);
                return Ok(ControllerUpdate::NotFound { path });
            }
        };

        let query = OperationQuery::any()
            .operation_type(self.vocab.update_action())
            .input_type(self.vocab.central.term("Drone"));
        let operation = match resource.resolve(&query) {
            Ok(operation) => operation,
            Err(e) => {
                warn!("◆ {}", e);
                return Ok(ControllerUpdate::NotFound { path });
            }
        };

        let body = codec::encode(drone)?;
        match self.invoker.exchange(resource.iri(), operation, Some(body)).await {
            Ok(response) if response.is_success() => {
                info!("◆ CONTROLLER ENTRY <{}> UPDATED", resource.iri());
                Ok(ControllerUpdate::Updated {
                    iri: resource.iri().to_string(),
                })
            }
            Ok(response) => {
                warn!(
                    "◆ CONTROLLER ENTRY <{}> REFUSED UPDATE: {} {}",
                    resource.iri(),
                    response.status,
                    response.reason
                );
                Ok(ControllerUpdate::Failed {
                    iri: resource.iri().to_string(),
                    status: response.status,
                })
            }
            Err(e @ SyncError::CallerContractViolation(_)) => Err(e),
            Err(e) => {
                warn!("◆ CONTROLLER ENTRY <{}> UNAVAILABLE: {}", resource.iri(), e);
                Ok(ControllerUpdate::NotFound { path })
            }
        }
    }

    // ========== Plumbing ==========

    async fn retrieve<T: Entity>(
        &self,
        resource: &ResourceDescriptor,
        query: &OperationQuery,
    ) -> Result<T> {
        let operation = resource.resolve(query)?;
        let invocation = self.invoker.invoke(resource.iri(), operation, None).await?;
        Ok(codec::decode(invocation.body.as_bytes())?)
    }

    /// Resolve the update operation for `input_type`, send `entity`, and
    /// describe wherever the remote says the result lives
    async fn submit<T: Entity>(
        &self,
        resource: &ResourceDescriptor,
        input_type: SemanticType,
        entity: &T,
    ) -> Result<ResourceDescriptor> {
        let query = OperationQuery::any()
            .operation_type(self.vocab.update_action())
            .input_type(input_type);
        let operation = resource.resolve(&query)?;

        let body = codec::encode(entity)?;
        let invocation = self
            .invoker
            .invoke(resource.iri(), operation, Some(body.clone()))
            .await?;
        log_confirmation(&body, &invocation.body);

        match invocation.location {
            Some(location) => Ok(self.client.describe(&location).await?),
            None => Ok(resource.clone()),
        }
    }
}

fn check_identity(drone: &Drone, addressed: i64) -> Result<()> {
    if drone.id == addressed {
        return Ok(());
    }
    warn!("◆ DRONE ID {} NOT VALID, CURRENT DRONE IS {}", addressed, drone.id);
    Err(SyncError::IdentityMismatch {
        expected: drone.id,
        found: addressed,
    })
}

fn log_confirmation(sent: &EncodedEntity, confirmation: &EncodedEntity) {
    if confirmation.is_empty() {
        return;
    }

    let received = match codec::decode_document(confirmation.as_bytes()) {
        Ok(received) => received,
        Err(e) => {
            debug!("◆ UNREADABLE CONFIRMATION: {}", e);
            return;
        }
    };

    let received = Value::Object(received);
    let echoed = codec::decode_document(sent.as_bytes())
        .map(|sent| canonical::equivalent(&Value::Object(sent), &received))
        .unwrap_or(false);
    if echoed {
        debug!("◆ CONFIRMATION ECHOES SUBMITTED DOCUMENT");
    } else {
        debug!("◆ CONFIRMATION: {}", received);
    }
}
