// src/domain/collection.rs
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

/// A user-owned named grouping of leads. `lead_count` is maintained by the
/// lead write paths, never aggregated ad hoc.
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub criteria: CollectionCriteria,
    pub lead_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Intended-membership metadata persisted with a collection. Descriptive
/// only: nothing enforces it against the actual leads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionCriteria {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CollectionCriteria {
    pub fn from_json(raw: &str) -> CollectionCriteria {
        // Bad rows degrade to empty criteria rather than failing the read.
        serde_json::from_str(raw).unwrap_or_default()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A collection name must survive trimming with at least 2 characters.
pub fn validate_name(name: &str) -> Result<String, ServerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("collection name is required".into()));
    }
    if name.chars().count() < 2 {
        return Err(ServerError::BadRequest(
            "collection name must be at least 2 characters".into(),
        ));
    }
    Ok(name.to_string())
}

/// Display name for a clone, matching the original's convention.
pub fn clone_name(name: &str) -> String {
    format!("Copy of {name}")
}
