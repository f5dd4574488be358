//! Partition-keyed entity store seam.
//!
//! The service only ever talks to [`EntityStore`]; the in-process
//! [`MemoryTableStore`] stands behind the same trait a remote table store
//! would. Every operation is all-or-nothing: uniqueness on insert and the
//! etag precondition on merge are enforced atomically by the store itself,
//! not by callers.

mod entity;
mod memory;

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use thiserror::Error;

pub use entity::{AttrValue, NewEntity, Properties, TableEntity};
pub use memory::MemoryTableStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table '{0}' already exists")]
    TableExists(String),
    #[error("table '{0}' does not exist")]
    TableNotFound(String),
    #[error("no entity with partition key '{partition_key}' and row key '{row_key}'")]
    EntityNotFound {
        partition_key: String,
        row_key: String,
    },
    #[error("entity with partition key '{partition_key}' and row key '{row_key}' already exists")]
    EntityExists {
        partition_key: String,
        row_key: String,
    },
    #[error("version precondition failed for partition key '{partition_key}', row key '{row_key}'")]
    PreconditionFailed {
        partition_key: String,
        row_key: String,
    },
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Ask for strong read consistency. Backends that are always consistent
    /// accept and ignore this.
    pub consistent: bool,
}

impl ReadOptions {
    pub fn consistent() -> Self {
        Self { consistent: true }
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Create the backing table. Fails with [`StoreError::TableExists`] when
    /// it is already there; idempotent bootstrap treats that as success.
    async fn create_table(&self) -> Result<(), StoreError>;

    async fn get_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        options: ReadOptions,
    ) -> Result<TableEntity, StoreError>;

    /// Insert a brand-new entity. The uniqueness check is atomic with the
    /// write: of two concurrent inserts for the same keys, exactly one
    /// succeeds and the other gets [`StoreError::EntityExists`].
    async fn insert_entity(&self, entity: NewEntity) -> Result<TableEntity, StoreError>;

    /// Merge `properties` over the stored entity if and only if its etag
    /// still equals `if_match` (compare-and-swap). Supplied properties
    /// overwrite, all others are retained. Issues a fresh etag and
    /// modification timestamp on success.
    async fn merge_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        properties: Properties,
        if_match: &str,
    ) -> Result<TableEntity, StoreError>;

    /// All entities in a partition, ordered by row key.
    async fn list_entities(&self, partition_key: &str) -> Result<Vec<TableEntity>, StoreError>;
}

/// Resolve the configured store URL into a live handle. Called once at
/// process start; the handle is shared by every request. An unrecognized
/// scheme is a fatal startup condition.
pub fn connect(store_url: &str, table: &str) -> anyhow::Result<Arc<dyn EntityStore>> {
    match store_url {
        "memory:" => Ok(Arc::new(MemoryTableStore::new(table))),
        other => bail!("unsupported store url '{other}' (expected 'memory:')"),
    }
}
