use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::invitations::{InsertInvitationEntity, InvitationEntity},
    value_objects::{
        enums::invitation_statuses::InvitationStatus, invitations::ListInvitationsFilter,
    },
};

#[async_trait]
#[automock]
pub trait InvitationRepository {
    async fn list_by_organizer(&self, filter: ListInvitationsFilter)
    -> Result<Vec<InvitationEntity>>;

    async fn count_by_organizer(
        &self,
        organizer_id: Uuid,
        status: Option<InvitationStatus>,
    ) -> Result<i64>;

    /// Invitations that count toward the plan quota (everything not archived).
    async fn count_active_by_organizer(&self, organizer_id: Uuid) -> Result<i64>;

    async fn find_by_id(
        &self,
        invitation_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<InvitationEntity>>;

    async fn create(&self, insert_invitation_entity: InsertInvitationEntity)
    -> Result<InvitationEntity>;

    /// Returns false when no matching invitation was owned by the organizer.
    async fn archive(&self, invitation_id: Uuid, organizer_id: Uuid) -> Result<bool>;
}
