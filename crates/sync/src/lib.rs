//! Flock drone synchronization core
//!
//! Resolves operations on the drone server and central controller by semantic
//! type, invokes them, and reconciles the returned records against the
//! current drone.

pub mod canonical;
pub mod codec;
pub mod controller;
pub mod entities;
pub mod error;
pub mod invoker;

pub use canonical::{canonicalize, equivalent, Canonical};
pub use codec::{decode, decode_document, encode, encode_value, CodecError, EncodedEntity, Entity};
pub use controller::{
    ControllerUpdate, SyncController, Vocabulary, CENTRAL_CONTROLLER, DRONE_SERVER,
};
pub use entities::{
    Command, ControllerLocation, Datastream, Direction, Drone, DroneState, DroneStateReport,
    DroneStatus, ParseError, Position,
};
pub use error::{Result, SyncError};
pub use invoker::{Invocation, RemoteInvoker, ACCEPTED_STATUSES};
