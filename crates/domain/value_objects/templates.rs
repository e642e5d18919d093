use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::templates::TemplateEntity;

/// Repository-level filter. `include_premium` is decided by the caller's entitlements,
/// never by request input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub is_premium: Option<bool>,
    pub search: Option<String>,
    pub include_premium: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateModel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_premium: bool,
    pub creator_id: Option<Uuid>,
    pub content: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TemplateEntity> for TemplateDto {
    fn from(value: TemplateEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            category: value.category,
            is_premium: value.is_premium,
            creator_id: value.creator_id,
            content: value.content,
            thumbnail_url: value.thumbnail_url,
            created_at: value.created_at,
        }
    }
}
