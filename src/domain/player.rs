use chrono::{DateTime, Utc};

use crate::storage::{AttrValue, NewEntity, Properties, TableEntity};

pub const DEFAULT_NAME: &str = "Guest";
pub const DEFAULT_LEVEL: i64 = 1;

const ATTR_NAME: &str = "name";
const ATTR_LEVEL: &str = "level";
const ATTR_EMAIL: &str = "email";
const ATTR_CREATED_AT: &str = "createdAt";

/// The sole entity: one row per player, partition key == row key ==
/// `player_id`. `version_tag` is the store's etag and changes on every
/// successful write; `created_at` is set once at creation.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    pub level: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version_tag: String,
}

impl PlayerRecord {
    /// Strip the store wrapper down to plain field values. Absent attributes
    /// fall back to the creation defaults; `created_at` falls back to now
    /// only when the stored copy is truly missing.
    pub fn from_entity(entity: &TableEntity) -> Self {
        let props = &entity.properties;
        Self {
            player_id: entity.partition_key.clone(),
            name: props
                .get(ATTR_NAME)
                .and_then(AttrValue::as_text)
                .unwrap_or(DEFAULT_NAME)
                .to_string(),
            level: props
                .get(ATTR_LEVEL)
                .and_then(AttrValue::as_int)
                .unwrap_or(DEFAULT_LEVEL),
            email: props
                .get(ATTR_EMAIL)
                .and_then(AttrValue::as_text)
                .unwrap_or_default()
                .to_string(),
            created_at: props
                .get(ATTR_CREATED_AT)
                .and_then(AttrValue::as_timestamp)
                .unwrap_or_else(Utc::now),
            updated_at: entity.timestamp,
            version_tag: entity.etag.clone(),
        }
    }
}

/// Fields accepted at creation; anything omitted gets a default.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub player_id: String,
    pub name: Option<String>,
    pub level: Option<i64>,
    pub email: Option<String>,
}

impl NewPlayer {
    /// Materialize the row to insert, applying defaults and stamping
    /// `created_at`.
    pub fn into_entity(self, created_at: DateTime<Utc>) -> NewEntity {
        let mut properties = Properties::new();
        properties.insert(
            ATTR_NAME.to_string(),
            AttrValue::Text(self.name.unwrap_or_else(|| DEFAULT_NAME.to_string())),
        );
        properties.insert(
            ATTR_LEVEL.to_string(),
            AttrValue::Int(self.level.unwrap_or(DEFAULT_LEVEL)),
        );
        properties.insert(
            ATTR_EMAIL.to_string(),
            AttrValue::Text(self.email.unwrap_or_default()),
        );
        properties.insert(
            ATTR_CREATED_AT.to_string(),
            AttrValue::Timestamp(created_at),
        );
        NewEntity {
            partition_key: self.player_id.clone(),
            row_key: self.player_id,
            properties,
        }
    }
}

/// Merge-update patch: supplied fields overwrite, omitted fields keep their
/// stored values.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub email: Option<String>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.level.is_none() && self.email.is_none()
    }

    /// Properties to merge over the stored row. `created_at` is re-pinned
    /// from the fetched record so a merge can never alter it.
    pub fn into_properties(self, created_at: DateTime<Utc>) -> Properties {
        let mut properties = Properties::new();
        if let Some(name) = self.name {
            properties.insert(ATTR_NAME.to_string(), AttrValue::Text(name));
        }
        if let Some(level) = self.level {
            properties.insert(ATTR_LEVEL.to_string(), AttrValue::Int(level));
        }
        if let Some(email) = self.email {
            properties.insert(ATTR_EMAIL.to_string(), AttrValue::Text(email));
        }
        properties.insert(
            ATTR_CREATED_AT.to_string(),
            AttrValue::Timestamp(created_at),
        );
        properties
    }
}
