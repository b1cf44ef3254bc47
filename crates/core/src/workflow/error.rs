//! Workflow error types for leave and swap lifecycles.
//!
//! Every workflow operation fails with exactly one of these variants. None is
//! retried inside the workflow layer and none is fatal to the process.

use rota_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::access::{Action, EntityKind, Role};
use crate::store::StoreError;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed or missing input. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity looked up.
        entity: EntityKind,
        /// The id that was not found.
        id: Uuid,
    },

    /// Ownership check failed for this specific entity.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The caller's role is not granted the action.
    #[error("Role {role} may not perform {action}")]
    NotPermitted {
        /// The caller's role.
        role: Role,
        /// The attempted action.
        action: Action,
    },

    /// The entity exists but its status does not permit the transition.
    #[error("Cannot {action} a {entity} in status {status}")]
    InvalidState {
        /// The kind of entity.
        entity: EntityKind,
        /// The entity's current status.
        status: &'static str,
        /// The attempted action.
        action: &'static str,
    },

    /// A precondition re-validated at commit time no longer holds.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The entity store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidState { .. } => 400,
            Self::Forbidden(_) | Self::NotPermitted { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotPermitted { .. } => "ACTION_NOT_PERMITTED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::StatusMismatch { .. }
            | StoreError::OwnershipChanged { .. }
            | StoreError::Duplicate(_)
            | StoreError::Contention(_) => Self::Conflict(err.to_string()),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let msg = err.to_string();
        match err {
            WorkflowError::Validation(_) => Self::Validation(msg),
            WorkflowError::NotFound { .. } => Self::NotFound(msg),
            WorkflowError::Forbidden(_) | WorkflowError::NotPermitted { .. } => {
                Self::Forbidden(msg)
            }
            WorkflowError::InvalidState { .. } => Self::BusinessRule(msg),
            WorkflowError::Conflict(_) => Self::Conflict(msg),
            WorkflowError::Store(_) => Self::Database(msg),
        }
    }
}
