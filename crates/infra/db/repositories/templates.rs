use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::templates::{InsertTemplateEntity, TemplateEntity},
    repositories::templates::TemplateRepository,
    value_objects::templates::TemplateFilter,
};
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::templates};

pub struct TemplatePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TemplatePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TemplateRepository for TemplatePostgres {
    async fn list(&self, filter: TemplateFilter) -> Result<Vec<TemplateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = templates::table.into_boxed();

        if !filter.include_premium {
            query = query.filter(templates::is_premium.eq(false));
        }
        if let Some(is_premium) = filter.is_premium {
            query = query.filter(templates::is_premium.eq(is_premium));
        }
        if let Some(category) = filter.category {
            query = query.filter(templates::category.eq(category));
        }
        if let Some(search) = filter.search {
            query = query.filter(templates::name.ilike(contains_pattern(&search)));
        }

        let rows = query
            .order((templates::created_at.desc(), templates::id.desc()))
            .select(TemplateEntity::as_select())
            .load::<TemplateEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn find_by_id(&self, template_id: Uuid) -> Result<Option<TemplateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let template = templates::table
            .filter(templates::id.eq(template_id))
            .select(TemplateEntity::as_select())
            .first::<TemplateEntity>(&mut conn)
            .optional()?;

        Ok(template)
    }

    async fn create(&self, insert_template_entity: InsertTemplateEntity) -> Result<TemplateEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let template = insert_into(templates::table)
            .values(&insert_template_entity)
            .returning(TemplateEntity::as_returning())
            .get_result::<TemplateEntity>(&mut conn)?;

        Ok(template)
    }
}

/// `%term%` with LIKE metacharacters in the term escaped (Postgres escapes with `\`).
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
