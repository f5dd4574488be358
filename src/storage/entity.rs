use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Scalar attribute value as stored in a table row. Kept deliberately small:
/// player rows only ever hold text, integers, booleans and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

pub type Properties = BTreeMap<String, AttrValue>;

/// Entity handed to an insert: identity plus caller-owned properties. The
/// etag and modification timestamp are store-assigned, never supplied.
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub partition_key: String,
    pub row_key: String,
    pub properties: Properties,
}

/// Entity as returned from the store, including its metadata.
#[derive(Debug, Clone)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    /// Opaque version tag, reissued on every write.
    pub etag: String,
    /// Last-modified time, store-managed.
    pub timestamp: DateTime<Utc>,
    pub properties: Properties,
}
