use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    application::dto::{CreatePlayerRequest, GetOptions, PlayerResponse, UpdatePlayerRequest},
    domain::{errors::DomainError, player::PlayerRecord},
    storage::{EntityStore, ReadOptions, StoreError},
};

/// Owns the player record lifecycle: create (with existence check), read
/// (with conditional short-circuit), merge update (version-guarded).
#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn EntityStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Idempotent table bootstrap, run once before serving. "Already exists"
    /// is success; any other failure is fatal for the caller.
    pub async fn bootstrap(&self) -> Result<(), DomainError> {
        match self.store.create_table().await {
            Ok(()) => {
                info!("player table created");
                Ok(())
            }
            Err(StoreError::TableExists(table)) => {
                debug!(table, "player table already present");
                Ok(())
            }
            Err(err) => Err(DomainError::storage(err.to_string())),
        }
    }

    pub async fn create_player(
        &self,
        request: CreatePlayerRequest,
    ) -> Result<PlayerResponse, DomainError> {
        request.validate()?;
        let new_player = request.into_new_player();
        let player_id = new_player.player_id.clone();

        // Best-effort pre-check for a friendlier error. The insert below is
        // the actual enforcement point: two concurrent creates can both pass
        // this check, and the store still rejects the second insert.
        match self
            .store
            .get_entity(&player_id, &player_id, ReadOptions::consistent())
            .await
        {
            Ok(_) => return Err(DomainError::already_exists(&player_id)),
            Err(StoreError::EntityNotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }

        let entity = new_player.into_entity(Utc::now());
        let stored = self.store.insert_entity(entity).await?;
        info!(player_id, "player created");
        Ok(PlayerRecord::from_entity(&stored).into())
    }

    pub async fn get_player(
        &self,
        player_id: &str,
        options: GetOptions,
    ) -> Result<PlayerResponse, DomainError> {
        if player_id.trim().is_empty() {
            return Err(DomainError::validation("playerId is required"));
        }
        let read = ReadOptions {
            consistent: options.consistent_read,
        };
        let entity = self.store.get_entity(player_id, player_id, read).await?;

        if let Some(tag) = options.if_none_match.as_deref()
            && tag == entity.etag
        {
            return Err(DomainError::NotModified);
        }

        Ok(PlayerRecord::from_entity(&entity).into())
    }

    pub async fn update_player(
        &self,
        player_id: &str,
        request: UpdatePlayerRequest,
        expected_version_tag: Option<String>,
    ) -> Result<PlayerResponse, DomainError> {
        if player_id.trim().is_empty() {
            return Err(DomainError::validation("playerId is required"));
        }
        request.validate()?;
        let patch = request.into_patch();

        let current = self
            .store
            .get_entity(player_id, player_id, ReadOptions::consistent())
            .await?;
        let current_record = PlayerRecord::from_entity(&current);

        // Fetch-then-conditionally-write: without a caller-supplied tag the
        // merge is still guarded by the tag just read, never a blind
        // overwrite. The store rejects the write if the tag went stale.
        let if_match = expected_version_tag.unwrap_or_else(|| current.etag.clone());
        let properties = patch.into_properties(current_record.created_at);

        let merged = self
            .store
            .merge_entity(player_id, player_id, properties, &if_match)
            .await?;
        debug!(player_id, "player updated");
        Ok(PlayerRecord::from_entity(&merged).into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PlayerService;
    use crate::{
        application::dto::{CreatePlayerRequest, GetOptions, UpdatePlayerRequest},
        domain::errors::DomainError,
        storage::MemoryTableStore,
    };

    async fn service() -> PlayerService {
        let service = PlayerService::new(Arc::new(MemoryTableStore::new("Players")));
        service.bootstrap().await.expect("bootstrap succeeds");
        service
    }

    fn create_request(player_id: &str) -> CreatePlayerRequest {
        CreatePlayerRequest {
            player_id: player_id.to_string(),
            name: None,
            level: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let service = service().await;
        service
            .bootstrap()
            .await
            .expect("second bootstrap treats existing table as success");
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let service = service().await;
        let created = service
            .create_player(create_request("p1"))
            .await
            .expect("create succeeds");

        assert_eq!(created.player_id, "p1");
        assert_eq!(created.name, "Guest");
        assert_eq!(created.level, 1);
        assert_eq!(created.email, "");
        assert!(!created.version_tag.is_empty());
    }

    #[tokio::test]
    async fn create_is_not_idempotent() {
        let service = service().await;
        service
            .create_player(create_request("p1"))
            .await
            .expect("first create succeeds");
        let second = service.create_player(create_request("p1")).await;
        assert!(matches!(second, Err(DomainError::AlreadyExists(id)) if id == "p1"));
    }

    #[tokio::test]
    async fn get_of_unknown_player_is_not_found() {
        let service = service().await;
        let missing = service.get_player("ghost", GetOptions::default()).await;
        assert!(matches!(missing, Err(DomainError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn get_with_matching_tag_short_circuits() {
        let service = service().await;
        let created = service
            .create_player(create_request("p1"))
            .await
            .expect("create succeeds");

        let unchanged = service
            .get_player(
                "p1",
                GetOptions {
                    if_none_match: Some(created.version_tag.clone()),
                    consistent_read: true,
                },
            )
            .await;
        assert!(matches!(unchanged, Err(DomainError::NotModified)));

        let fresh = service
            .get_player("p1", GetOptions::default())
            .await
            .expect("plain get returns the record");
        assert_eq!(fresh.version_tag, created.version_tag);
    }

    #[tokio::test]
    async fn update_merges_and_preserves_created_at() {
        let service = service().await;
        let created = service
            .create_player(create_request("p1"))
            .await
            .expect("create succeeds");

        let updated = service
            .update_player(
                "p1",
                UpdatePlayerRequest {
                    level: Some(5),
                    ..UpdatePlayerRequest::default()
                },
                None,
            )
            .await
            .expect("update succeeds");

        assert_eq!(updated.level, 5);
        assert_eq!(updated.name, "Guest", "unsupplied fields are retained");
        assert_eq!(updated.created_at, created.created_at);
        assert_ne!(updated.version_tag, created.version_tag);
    }

    #[tokio::test]
    async fn update_with_stale_tag_conflicts() {
        let service = service().await;
        let created = service
            .create_player(create_request("p1"))
            .await
            .expect("create succeeds");

        // Concurrent writer bumps the version tag.
        service
            .update_player(
                "p1",
                UpdatePlayerRequest {
                    level: Some(2),
                    ..UpdatePlayerRequest::default()
                },
                None,
            )
            .await
            .expect("first update succeeds");

        let stale = service
            .update_player(
                "p1",
                UpdatePlayerRequest {
                    level: Some(9),
                    ..UpdatePlayerRequest::default()
                },
                Some(created.version_tag),
            )
            .await;
        assert!(matches!(stale, Err(DomainError::UpdateConflict(id)) if id == "p1"));
    }

    #[tokio::test]
    async fn update_of_unknown_player_is_not_found() {
        let service = service().await;
        let missing = service
            .update_player(
                "ghost",
                UpdatePlayerRequest {
                    level: Some(2),
                    ..UpdatePlayerRequest::default()
                },
                None,
            )
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_before_any_store_call() {
        let service = service().await;
        let rejected = service
            .update_player("p1", UpdatePlayerRequest::default(), None)
            .await;
        assert!(matches!(rejected, Err(DomainError::Validation(_))));
    }
}
