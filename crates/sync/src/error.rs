//! Sync failure taxonomy

use flock_hydra::{HydraError, OperationQuery};
use thiserror::Error;

use crate::codec::CodecError;

/// Sync failures
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("NO OPERATION ON <{resource}> MATCHES {query}")]
    NoMatchingOperation {
        resource: String,
        query: OperationQuery,
    },

    #[error("LINK DOWN: <{0}> UNREACHABLE")]
    ConnectionUnavailable(String),

    #[error("CONNECTION REFUSED, CHECK THE {0}")]
    RemoteUnavailable(String),

    #[error("REMOTE ANSWERED {status} {reason}")]
    ProtocolStatus { status: u16, reason: String },

    #[error("DRONE ID {found} NOT VALID, CURRENT DRONE IS {expected}")]
    IdentityMismatch { expected: i64, found: i64 },

    #[error("CALLER CONTRACT VIOLATED: {0}")]
    CallerContractViolation(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Hydra(HydraError),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<HydraError> for SyncError {
    fn from(err: HydraError) -> Self {
        match err {
            HydraError::ConnectionUnavailable(url) => SyncError::ConnectionUnavailable(url),
            HydraError::NoMatchingOperation { resource, query } => {
                SyncError::NoMatchingOperation { resource, query }
            }
            other => SyncError::Hydra(other),
        }
    }
}

impl SyncError {
    /// Name the remote behind a refused connection
    pub fn unavailable_as(self, remote: &str) -> Self {
        match self {
            SyncError::ConnectionUnavailable(_) => SyncError::RemoteUnavailable(remote.to_string()),
            other => other,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            SyncError::ConnectionUnavailable(_) | SyncError::RemoteUnavailable(_)
        )
    }
}
