use thiserror::Error;

use crate::storage::StoreError;

/// Closed error taxonomy for the player record lifecycle. The HTTP boundary
/// maps each variant to exactly one status code; nothing else crosses that
/// boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("player '{0}' not found")]
    NotFound(String),
    #[error("player '{0}' already exists")]
    AlreadyExists(String),
    #[error("update conflict for player '{0}'")]
    UpdateConflict(String),
    /// Conditional-read short-circuit. Not a true failure: the caller's
    /// cached copy is still valid.
    #[error("content not modified")]
    NotModified,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(player_id: impl Into<String>) -> Self {
        Self::NotFound(player_id.into())
    }

    pub fn already_exists(player_id: impl Into<String>) -> Self {
        Self::AlreadyExists(player_id.into())
    }

    pub fn update_conflict(player_id: impl Into<String>) -> Self {
        Self::UpdateConflict(player_id.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Store errors carry the partition/row keys as typed fields, so the domain
/// mapping reads those directly instead of scraping error text.
impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntityNotFound { partition_key, .. } => Self::NotFound(partition_key),
            StoreError::EntityExists { partition_key, .. } => Self::AlreadyExists(partition_key),
            StoreError::PreconditionFailed { partition_key, .. } => {
                Self::UpdateConflict(partition_key)
            }
            other => Self::Storage(other.to_string()),
        }
    }
}
