use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::invitations::InvitationEntity,
    value_objects::enums::invitation_statuses::InvitationStatus,
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationModel {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    /// Defaults to the plan's guest ceiling when omitted.
    #[serde(default)]
    pub max_guests: Option<i32>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<InvitationStatus>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListInvitationsFilter {
    pub organizer_id: Uuid,
    pub status: Option<InvitationStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDto {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub template_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_guests: i32,
    pub status: String,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationEntity> for InvitationDto {
    fn from(value: InvitationEntity) -> Self {
        Self {
            id: value.id,
            organizer_id: value.organizer_id,
            template_id: value.template_id,
            title: value.title,
            description: value.description,
            event_date: value.event_date,
            location: value.location,
            max_guests: value.max_guests,
            status: value.status,
            settings: value.settings,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvitationListDto {
    pub invitations: Vec<InvitationDto>,
    pub pagination: Pagination,
}
