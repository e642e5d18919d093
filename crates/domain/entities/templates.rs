use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::templates;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = templates)]
pub struct TemplateEntity {
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

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = templates)]
pub struct InsertTemplateEntity {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_premium: bool,
    pub creator_id: Option<Uuid>,
    pub content: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
