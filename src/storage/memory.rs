use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, NewEntity, Properties, ReadOptions, StoreError, TableEntity};

#[derive(Debug, Clone)]
struct StoredRow {
    etag: String,
    timestamp: DateTime<Utc>,
    properties: Properties,
}

#[derive(Default)]
struct TableState {
    created: bool,
    rows: HashMap<(String, String), StoredRow>,
}

/// In-process [`EntityStore`] over a single table. Each mutating operation
/// takes the write lock, so uniqueness on insert and the etag precondition
/// on merge hold atomically. Reads are always strongly consistent here, so
/// [`ReadOptions::consistent`] is accepted and irrelevant.
pub struct MemoryTableStore {
    table: String,
    state: RwLock<TableState>,
}

impl MemoryTableStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            state: RwLock::new(TableState::default()),
        }
    }

    fn fresh_etag() -> String {
        Uuid::new_v4().to_string()
    }

    fn entity(partition_key: &str, row_key: &str, row: &StoredRow) -> TableEntity {
        TableEntity {
            partition_key: partition_key.to_string(),
            row_key: row_key.to_string(),
            etag: row.etag.clone(),
            timestamp: row.timestamp,
            properties: row.properties.clone(),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryTableStore {
    async fn create_table(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.created {
            return Err(StoreError::TableExists(self.table.clone()));
        }
        state.created = true;
        Ok(())
    }

    async fn get_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        _options: ReadOptions,
    ) -> Result<TableEntity, StoreError> {
        let state = self.state.read().await;
        if !state.created {
            return Err(StoreError::TableNotFound(self.table.clone()));
        }
        let key = (partition_key.to_string(), row_key.to_string());
        let Some(row) = state.rows.get(&key) else {
            return Err(StoreError::EntityNotFound {
                partition_key: partition_key.to_string(),
                row_key: row_key.to_string(),
            });
        };
        Ok(Self::entity(partition_key, row_key, row))
    }

    async fn insert_entity(&self, entity: NewEntity) -> Result<TableEntity, StoreError> {
        let mut state = self.state.write().await;
        if !state.created {
            return Err(StoreError::TableNotFound(self.table.clone()));
        }
        let key = (entity.partition_key.clone(), entity.row_key.clone());
        if state.rows.contains_key(&key) {
            return Err(StoreError::EntityExists {
                partition_key: entity.partition_key,
                row_key: entity.row_key,
            });
        }
        let row = StoredRow {
            etag: Self::fresh_etag(),
            timestamp: Utc::now(),
            properties: entity.properties,
        };
        let stored = Self::entity(&entity.partition_key, &entity.row_key, &row);
        state.rows.insert(key, row);
        Ok(stored)
    }

    async fn merge_entity(
        &self,
        partition_key: &str,
        row_key: &str,
        properties: Properties,
        if_match: &str,
    ) -> Result<TableEntity, StoreError> {
        let mut state = self.state.write().await;
        if !state.created {
            return Err(StoreError::TableNotFound(self.table.clone()));
        }
        let key = (partition_key.to_string(), row_key.to_string());
        let Some(row) = state.rows.get_mut(&key) else {
            return Err(StoreError::EntityNotFound {
                partition_key: partition_key.to_string(),
                row_key: row_key.to_string(),
            });
        };
        if row.etag != if_match {
            return Err(StoreError::PreconditionFailed {
                partition_key: partition_key.to_string(),
                row_key: row_key.to_string(),
            });
        }
        row.properties.extend(properties);
        row.etag = Self::fresh_etag();
        row.timestamp = Utc::now();
        Ok(Self::entity(partition_key, row_key, row))
    }

    async fn list_entities(&self, partition_key: &str) -> Result<Vec<TableEntity>, StoreError> {
        let state = self.state.read().await;
        if !state.created {
            return Err(StoreError::TableNotFound(self.table.clone()));
        }
        let mut entities: Vec<TableEntity> = state
            .rows
            .iter()
            .filter(|((partition, _), _)| partition == partition_key)
            .map(|((partition, row_key), row)| Self::entity(partition, row_key, row))
            .collect();
        entities.sort_by(|left, right| left.row_key.cmp(&right.row_key));
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AttrValue;

    fn text_props(key: &str, value: &str) -> Properties {
        let mut properties = Properties::new();
        properties.insert(key.to_string(), AttrValue::Text(value.to_string()));
        properties
    }

    fn new_entity(id: &str) -> NewEntity {
        NewEntity {
            partition_key: id.to_string(),
            row_key: id.to_string(),
            properties: text_props("name", "Guest"),
        }
    }

    #[tokio::test]
    async fn create_table_is_rejected_when_already_present() {
        let store = MemoryTableStore::new("Players");
        store.create_table().await.expect("first create succeeds");
        assert!(matches!(
            store.create_table().await,
            Err(StoreError::TableExists(_))
        ));
    }

    #[tokio::test]
    async fn operations_require_a_created_table() {
        let store = MemoryTableStore::new("Players");
        assert!(matches!(
            store
                .get_entity("p1", "p1", ReadOptions::default())
                .await,
            Err(StoreError::TableNotFound(_))
        ));
        assert!(matches!(
            store.insert_entity(new_entity("p1")).await,
            Err(StoreError::TableNotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected_atomically() {
        let store = MemoryTableStore::new("Players");
        store.create_table().await.expect("create table");
        store
            .insert_entity(new_entity("p1"))
            .await
            .expect("first insert succeeds");
        assert!(matches!(
            store.insert_entity(new_entity("p1")).await,
            Err(StoreError::EntityExists { .. })
        ));
    }

    #[tokio::test]
    async fn merge_is_guarded_by_etag_and_retains_other_properties() {
        let store = MemoryTableStore::new("Players");
        store.create_table().await.expect("create table");
        let inserted = store
            .insert_entity(new_entity("p1"))
            .await
            .expect("insert succeeds");

        let stale = store
            .merge_entity("p1", "p1", text_props("email", "a@b.c"), "bogus-tag")
            .await;
        assert!(matches!(stale, Err(StoreError::PreconditionFailed { .. })));

        let merged = store
            .merge_entity("p1", "p1", text_props("email", "a@b.c"), &inserted.etag)
            .await
            .expect("merge with current etag succeeds");

        assert_ne!(merged.etag, inserted.etag, "etag changes on every write");
        assert_eq!(
            merged.properties.get("name"),
            Some(&AttrValue::Text("Guest".to_string())),
            "unsupplied properties are retained"
        );
        assert_eq!(
            merged.properties.get("email"),
            Some(&AttrValue::Text("a@b.c".to_string()))
        );
    }

    #[tokio::test]
    async fn merge_of_missing_entity_reports_not_found() {
        let store = MemoryTableStore::new("Players");
        store.create_table().await.expect("create table");
        assert!(matches!(
            store
                .merge_entity("p1", "p1", Properties::new(), "any")
                .await,
            Err(StoreError::EntityNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_partition() {
        let store = MemoryTableStore::new("Players");
        store.create_table().await.expect("create table");
        store
            .insert_entity(new_entity("p1"))
            .await
            .expect("insert p1");
        store
            .insert_entity(new_entity("p2"))
            .await
            .expect("insert p2");

        let listed = store.list_entities("p1").await.expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].row_key, "p1");
    }
}
