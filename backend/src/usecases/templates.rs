use chrono::Utc;
use crates::domain::{
    entities::{plans::PlanEntity, templates::InsertTemplateEntity},
    repositories::{
        app_users::AppUserRepository, subscriptions::SubscriptionRepository,
        templates::TemplateRepository,
    },
    value_objects::{
        entitlements::{EntitlementDenial, EntitlementEvaluator, is_template_visible},
        templates::{CreateTemplateModel, TemplateDto, TemplateFilter},
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::usecases::plan_resolver::PlanResolver;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("User not found")]
    UserNotFound,
    #[error("Template not found")]
    TemplateNotFound,
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Entitlement(#[from] EntitlementDenial),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type UseCaseResult<T> = std::result::Result<T, TemplateError>;

/// Listing filters as requested by the caller. Visibility is applied on top.
#[derive(Debug, Clone, Default)]
pub struct TemplateQuery {
    pub category: Option<String>,
    pub is_premium: Option<bool>,
    pub search: Option<String>,
}

pub struct TemplatesUseCase<T, U, S>
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    template_repo: Arc<T>,
    user_repo: Arc<U>,
    plan_resolver: Arc<PlanResolver<S>>,
}

impl<T, U, S> TemplatesUseCase<T, U, S>
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(template_repo: Arc<T>, user_repo: Arc<U>, plan_resolver: Arc<PlanResolver<S>>) -> Self {
        Self {
            template_repo,
            user_repo,
            plan_resolver,
        }
    }

    pub async fn list(
        &self,
        viewer: Option<Uuid>,
        query: TemplateQuery,
    ) -> UseCaseResult<Vec<TemplateDto>> {
        let plan = self.viewer_plan(viewer).await?;
        let include_premium = is_template_visible(plan.as_ref(), true);

        if query.is_premium == Some(true) && !include_premium {
            info!(viewer = ?viewer, "templates: premium listing requested without premium access");
            return Ok(Vec::new());
        }

        let filter = TemplateFilter {
            category: non_blank(query.category),
            is_premium: query.is_premium,
            search: non_blank(query.search),
            include_premium,
        };

        let templates = self.template_repo.list(filter).await.map_err(|err| {
            error!(viewer = ?viewer, db_error = ?err, "templates: failed to list templates");
            TemplateError::Internal(err)
        })?;

        let visible = templates
            .into_iter()
            .filter(|template| is_template_visible(plan.as_ref(), template.is_premium))
            .map(TemplateDto::from)
            .collect::<Vec<_>>();

        info!(
            viewer = ?viewer,
            include_premium,
            returned = visible.len(),
            "templates: list loaded"
        );

        Ok(visible)
    }

    /// Hidden premium templates are reported as missing rather than forbidden.
    pub async fn get(&self, viewer: Option<Uuid>, template_id: Uuid) -> UseCaseResult<TemplateDto> {
        let template = self
            .template_repo
            .find_by_id(template_id)
            .await
            .map_err(|err| {
                error!(%template_id, db_error = ?err, "templates: failed to load template");
                TemplateError::Internal(err)
            })?
            .ok_or(TemplateError::TemplateNotFound)?;

        if template.is_premium {
            let plan = self.viewer_plan(viewer).await?;
            if !is_template_visible(plan.as_ref(), true) {
                info!(viewer = ?viewer, %template_id, "templates: premium template hidden from viewer");
                return Err(TemplateError::TemplateNotFound);
            }
        }

        Ok(template.into())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        model: CreateTemplateModel,
    ) -> UseCaseResult<TemplateDto> {
        info!(%user_id, is_premium = model.is_premium, "templates: create requested");

        if model.name.trim().is_empty() {
            return Err(TemplateError::InvalidRequest(
                "name must not be empty".to_string(),
            ));
        }
        if model.category.trim().is_empty() {
            return Err(TemplateError::InvalidRequest(
                "category must not be empty".to_string(),
            ));
        }

        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "templates: failed to load user");
            TemplateError::Internal(err)
        })?;
        if user.is_none() {
            warn!(%user_id, "templates: authenticated caller has no user record");
            return Err(TemplateError::UserNotFound);
        }

        if model.is_premium {
            let plan = self.resolve_plan(user_id).await?;
            EntitlementEvaluator::new(&plan)
                .can_create_template(true)
                .into_result()
                .map_err(|denial| {
                    warn!(
                        %user_id,
                        plan_id = %plan.tier,
                        reason = denial.reason.code(),
                        "templates: premium template creation requires upgrade"
                    );
                    denial
                })?;
        }

        let insert_template_entity = InsertTemplateEntity {
            name: model.name.trim().to_string(),
            description: model.description,
            category: model.category.trim().to_string(),
            is_premium: model.is_premium,
            creator_id: Some(user_id),
            content: model.content.unwrap_or_else(|| serde_json::json!({})),
            thumbnail_url: model.thumbnail_url,
            created_at: Utc::now(),
        };

        let template = self
            .template_repo
            .create(insert_template_entity)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "templates: failed to create template");
                TemplateError::Internal(err)
            })?;

        info!(%user_id, template_id = %template.id, "templates: template created");

        Ok(template.into())
    }

    async fn viewer_plan(&self, viewer: Option<Uuid>) -> UseCaseResult<Option<PlanEntity>> {
        match viewer {
            Some(user_id) => self.resolve_plan(user_id).await.map(Some),
            None => Ok(None),
        }
    }

    async fn resolve_plan(&self, user_id: Uuid) -> UseCaseResult<PlanEntity> {
        self.plan_resolver
            .resolve_effective_plan_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "templates: failed to resolve plan");
                TemplateError::Internal(err)
            })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::{
            app_users::AppUserEntity, subscriptions::SubscriptionEntity,
            templates::TemplateEntity,
        },
        repositories::{
            app_users::MockAppUserRepository, subscriptions::MockSubscriptionRepository,
            templates::MockTemplateRepository,
        },
        value_objects::{entitlements::EntitlementReason, plans::PlanCatalog},
    };
    use mockall::predicate::{eq, function};

    type TestUseCase =
        TemplatesUseCase<MockTemplateRepository, MockAppUserRepository, MockSubscriptionRepository>;

    fn sample_template(name: &str, is_premium: bool) -> TemplateEntity {
        TemplateEntity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            category: "birthday".to_string(),
            is_premium,
            creator_id: None,
            content: serde_json::json!({}),
            thumbnail_url: None,
            created_at: Utc::now(),
        }
    }

    fn subscriptions_for(user_id: Uuid, plan_id: Option<&'static str>) -> MockSubscriptionRepository {
        let mut repo = MockSubscriptionRepository::new();
        let subscription = plan_id.map(|plan_id| {
            let now = Utc::now();
            SubscriptionEntity {
                id: Uuid::new_v4(),
                user_id,
                plan_id: plan_id.to_string(),
                status: "active".to_string(),
                current_period_start: now - Duration::days(1),
                current_period_end: now + Duration::days(29),
                created_at: now,
            }
        });
        repo.expect_find_current_subscription()
            .with(eq(user_id))
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(subscription) })
            });
        repo
    }

    fn existing_user() -> MockAppUserRepository {
        let mut repo = MockAppUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            Box::pin(async move {
                Ok(Some(AppUserEntity {
                    id,
                    email: None,
                    created_at: Utc::now(),
                }))
            })
        });
        repo
    }

    fn build(
        templates: MockTemplateRepository,
        users: MockAppUserRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> TestUseCase {
        let plan_resolver =
            PlanResolver::new(Arc::new(subscriptions), Arc::new(PlanCatalog::standard()));
        TemplatesUseCase::new(Arc::new(templates), Arc::new(users), Arc::new(plan_resolver))
    }

    /// Repository stub that ignores the filter and returns a mixed set.
    fn mixed_catalog() -> MockTemplateRepository {
        let mut repo = MockTemplateRepository::new();
        repo.expect_list().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    sample_template("Confetti", false),
                    sample_template("Velvet", true),
                ])
            })
        });
        repo
    }

    #[tokio::test]
    async fn anonymous_listing_never_returns_premium() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_find_current_subscription().never();
        let usecase = build(mixed_catalog(), MockAppUserRepository::new(), subscriptions);

        let templates = usecase.list(None, TemplateQuery::default()).await.unwrap();

        assert_eq!(templates.len(), 1);
        assert!(templates.iter().all(|t| !t.is_premium));
    }

    #[tokio::test]
    async fn anonymous_listing_excludes_premium_at_the_query() {
        let mut templates = MockTemplateRepository::new();
        templates
            .expect_list()
            .with(function(|filter: &TemplateFilter| {
                !filter.include_premium && filter.category.as_deref() == Some("wedding")
            }))
            .times(1)
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        let usecase = build(
            templates,
            MockAppUserRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let query = TemplateQuery {
            category: Some(" wedding ".to_string()),
            search: Some("  ".to_string()),
            ..TemplateQuery::default()
        };
        usecase.list(None, query).await.unwrap();
    }

    #[tokio::test]
    async fn free_user_asking_for_premium_gets_nothing() {
        let user_id = Uuid::new_v4();
        let mut templates = MockTemplateRepository::new();
        templates.expect_list().never();
        let usecase = build(
            templates,
            MockAppUserRepository::new(),
            subscriptions_for(user_id, None),
        );

        let query = TemplateQuery {
            is_premium: Some(true),
            ..TemplateQuery::default()
        };
        let result = usecase.list(Some(user_id), query).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn premium_user_sees_premium_templates() {
        let user_id = Uuid::new_v4();
        let usecase = build(
            mixed_catalog(),
            MockAppUserRepository::new(),
            subscriptions_for(user_id, Some("premium")),
        );

        let templates = usecase
            .list(Some(user_id), TemplateQuery::default())
            .await
            .unwrap();

        assert_eq!(templates.len(), 2);
        assert!(templates.iter().any(|t| t.is_premium));
    }

    #[tokio::test]
    async fn premium_template_lookup_is_hidden_from_anonymous() {
        let template = sample_template("Velvet", true);
        let template_id = template.id;
        let mut templates = MockTemplateRepository::new();
        templates.expect_find_by_id().returning(move |_| {
            let template = template.clone();
            Box::pin(async move { Ok(Some(template)) })
        });
        let usecase = build(
            templates,
            MockAppUserRepository::new(),
            MockSubscriptionRepository::new(),
        );

        assert!(matches!(
            usecase.get(None, template_id).await,
            Err(TemplateError::TemplateNotFound)
        ));
    }

    #[tokio::test]
    async fn free_user_cannot_create_premium_template() {
        let user_id = Uuid::new_v4();
        let mut templates = MockTemplateRepository::new();
        templates.expect_create().never();
        let usecase = build(templates, existing_user(), subscriptions_for(user_id, None));

        let model = CreateTemplateModel {
            name: "Velvet".to_string(),
            description: None,
            category: "wedding".to_string(),
            is_premium: true,
            content: None,
            thumbnail_url: None,
        };
        let err = usecase.create(user_id, model).await.unwrap_err();

        assert!(matches!(
            err,
            TemplateError::Entitlement(EntitlementDenial {
                reason: EntitlementReason::PremiumRequired,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn free_user_creates_free_template_without_plan_lookup() {
        let user_id = Uuid::new_v4();
        let mut templates = MockTemplateRepository::new();
        templates.expect_create().times(1).returning(|entity| {
            Box::pin(async move {
                Ok(TemplateEntity {
                    id: Uuid::new_v4(),
                    name: entity.name,
                    description: entity.description,
                    category: entity.category,
                    is_premium: entity.is_premium,
                    creator_id: entity.creator_id,
                    content: entity.content,
                    thumbnail_url: entity.thumbnail_url,
                    created_at: entity.created_at,
                })
            })
        });
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_find_current_subscription().never();
        let usecase = build(templates, existing_user(), subscriptions);

        let model = CreateTemplateModel {
            name: " Confetti ".to_string(),
            description: None,
            category: "birthday".to_string(),
            is_premium: false,
            content: None,
            thumbnail_url: None,
        };
        let template = usecase.create(user_id, model).await.unwrap();

        assert_eq!(template.name, "Confetti");
        assert_eq!(template.creator_id, Some(user_id));
        assert!(!template.is_premium);
    }
}
