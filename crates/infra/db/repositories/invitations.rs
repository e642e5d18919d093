use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::invitations::{InsertInvitationEntity, InvitationEntity},
    repositories::invitations::InvitationRepository,
    value_objects::{
        enums::invitation_statuses::InvitationStatus, invitations::ListInvitationsFilter,
    },
};
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::invitations};

pub struct InvitationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvitationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvitationRepository for InvitationPostgres {
    async fn list_by_organizer(
        &self,
        filter: ListInvitationsFilter,
    ) -> Result<Vec<InvitationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = invitations::table
            .filter(invitations::organizer_id.eq(filter.organizer_id))
            .into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(invitations::status.eq(status.to_string()));
        }

        let rows = query
            .order((invitations::created_at.desc(), invitations::id.desc()))
            .limit(filter.limit)
            .offset(filter.offset)
            .select(InvitationEntity::as_select())
            .load::<InvitationEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn count_by_organizer(
        &self,
        organizer_id: Uuid,
        status: Option<InvitationStatus>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = invitations::table
            .filter(invitations::organizer_id.eq(organizer_id))
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(invitations::status.eq(status.to_string()));
        }

        let total = query.count().get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn count_active_by_organizer(&self, organizer_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = invitations::table
            .filter(invitations::organizer_id.eq(organizer_id))
            .filter(invitations::status.ne(InvitationStatus::Archived.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn find_by_id(
        &self,
        invitation_id: Uuid,
        organizer_id: Uuid,
    ) -> Result<Option<InvitationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invitation = invitations::table
            .filter(invitations::id.eq(invitation_id))
            .filter(invitations::organizer_id.eq(organizer_id))
            .select(InvitationEntity::as_select())
            .first::<InvitationEntity>(&mut conn)
            .optional()?;

        Ok(invitation)
    }

    async fn create(
        &self,
        insert_invitation_entity: InsertInvitationEntity,
    ) -> Result<InvitationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invitation = insert_into(invitations::table)
            .values(&insert_invitation_entity)
            .returning(InvitationEntity::as_returning())
            .get_result::<InvitationEntity>(&mut conn)?;

        Ok(invitation)
    }

    async fn archive(&self, invitation_id: Uuid, organizer_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(invitations::table)
            .filter(invitations::id.eq(invitation_id))
            .filter(invitations::organizer_id.eq(organizer_id))
            .set((
                invitations::status.eq(InvitationStatus::Archived.to_string()),
                invitations::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
