use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError,
    player::{NewPlayer, PlayerPatch, PlayerRecord},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CreatePlayerRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.player_id.trim().is_empty() {
            return Err(DomainError::validation("playerId is required"));
        }
        if let Some(level) = self.level
            && level < 0
        {
            return Err(DomainError::validation("level must not be negative"));
        }
        Ok(())
    }

    pub fn into_new_player(self) -> NewPlayer {
        NewPlayer {
            player_id: self.player_id.trim().to_string(),
            name: self.name,
            level: self.level,
            email: self.email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdatePlayerRequest {
    /// Empty patches are a bad request, not a no-op success.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_none() && self.level.is_none() && self.email.is_none() {
            return Err(DomainError::validation(
                "at least one of name, level or email must be supplied",
            ));
        }
        if let Some(level) = self.level
            && level < 0
        {
            return Err(DomainError::validation("level must not be negative"));
        }
        Ok(())
    }

    pub fn into_patch(self) -> PlayerPatch {
        PlayerPatch {
            name: self.name,
            level: self.level,
            email: self.email,
        }
    }
}

/// Read-path options, derived from request headers by the boundary layer.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Previously-seen version tag; a match short-circuits to NotModified.
    pub if_none_match: Option<String>,
    /// Request strong read consistency from the store.
    pub consistent_read: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub player_id: String,
    pub name: String,
    pub level: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version_tag: String,
}

impl From<PlayerRecord> for PlayerResponse {
    fn from(value: PlayerRecord) -> Self {
        Self {
            player_id: value.player_id,
            name: value.name,
            level: value.level,
            email: value.email,
            created_at: value.created_at,
            updated_at: value.updated_at,
            version_tag: value.version_tag,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
