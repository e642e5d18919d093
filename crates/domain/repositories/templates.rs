use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::templates::{InsertTemplateEntity, TemplateEntity},
    value_objects::templates::TemplateFilter,
};

#[async_trait]
#[automock]
pub trait TemplateRepository {
    async fn list(&self, filter: TemplateFilter) -> Result<Vec<TemplateEntity>>;

    async fn find_by_id(&self, template_id: Uuid) -> Result<Option<TemplateEntity>>;

    async fn create(&self, insert_template_entity: InsertTemplateEntity) -> Result<TemplateEntity>;
}
