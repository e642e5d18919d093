use chrono::Utc;
use crates::domain::{
    entities::{invitations::InsertInvitationEntity, plans::PlanEntity},
    repositories::{
        app_users::AppUserRepository, invitations::InvitationRepository,
        subscriptions::SubscriptionRepository, templates::TemplateRepository,
    },
    value_objects::{
        entitlements::{EntitlementDenial, EntitlementEvaluator},
        enums::invitation_statuses::InvitationStatus,
        invitations::{
            CreateInvitationModel, InvitationDto, InvitationListDto, ListInvitationsFilter,
            Pagination,
        },
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::usecases::plan_resolver::PlanResolver;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("User not found")]
    UserNotFound,
    #[error("Template not found")]
    TemplateNotFound,
    #[error("Invitation not found")]
    InvitationNotFound,
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Entitlement(#[from] EntitlementDenial),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type UseCaseResult<T> = std::result::Result<T, InvitationError>;

pub struct InvitationsUseCase<I, T, U, S>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    invitation_repo: Arc<I>,
    template_repo: Arc<T>,
    user_repo: Arc<U>,
    plan_resolver: Arc<PlanResolver<S>>,
}

impl<I, T, U, S> InvitationsUseCase<I, T, U, S>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        invitation_repo: Arc<I>,
        template_repo: Arc<T>,
        user_repo: Arc<U>,
        plan_resolver: Arc<PlanResolver<S>>,
    ) -> Self {
        Self {
            invitation_repo,
            template_repo,
            user_repo,
            plan_resolver,
        }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<InvitationStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> UseCaseResult<InvitationListDto> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(InvitationError::InvalidRequest(format!(
                "limit must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(InvitationError::InvalidRequest(
                "offset must not be negative".to_string(),
            ));
        }

        let filter = ListInvitationsFilter {
            organizer_id: user_id,
            status,
            limit,
            offset,
        };

        let invitations = self
            .invitation_repo
            .list_by_organizer(filter)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "invitations: failed to list invitations");
                InvitationError::Internal(err)
            })?;

        let total = self
            .invitation_repo
            .count_by_organizer(user_id, status)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "invitations: failed to count invitations");
                InvitationError::Internal(err)
            })?;

        info!(
            %user_id,
            returned = invitations.len(),
            total,
            "invitations: list loaded"
        );

        Ok(InvitationListDto {
            invitations: invitations.into_iter().map(InvitationDto::from).collect(),
            pagination: Pagination::new(total, limit, offset),
        })
    }

    pub async fn get(&self, user_id: Uuid, invitation_id: Uuid) -> UseCaseResult<InvitationDto> {
        let invitation = self
            .invitation_repo
            .find_by_id(invitation_id, user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %invitation_id,
                    db_error = ?err,
                    "invitations: failed to load invitation"
                );
                InvitationError::Internal(err)
            })?
            .ok_or(InvitationError::InvitationNotFound)?;

        Ok(invitation.into())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        model: CreateInvitationModel,
    ) -> UseCaseResult<InvitationDto> {
        info!(%user_id, template_id = ?model.template_id, "invitations: create requested");

        validate_create_model(&model)?;
        self.ensure_user_exists(user_id).await?;

        let plan = self
            .plan_resolver
            .resolve_effective_plan_for_user(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "invitations: failed to resolve plan while checking quota"
                );
                InvitationError::Internal(err)
            })?;
        let evaluator = EntitlementEvaluator::new(&plan);

        let current = self
            .invitation_repo
            .count_active_by_organizer(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "invitations: failed to count active invitations");
                InvitationError::Internal(err)
            })?;

        evaluator
            .can_create_invitation(current)
            .into_result()
            .map_err(|denial| {
                warn!(
                    %user_id,
                    plan_id = %plan.tier,
                    max_invitations = plan.max_invitations,
                    current_active = current,
                    reason = denial.reason.code(),
                    "invitations: invitation limit reached"
                );
                denial
            })?;

        let max_guests = model.max_guests.unwrap_or(plan.max_guests);
        evaluator
            .can_invite_guests(max_guests)
            .into_result()
            .map_err(|denial| {
                warn!(
                    %user_id,
                    plan_id = %plan.tier,
                    plan_max_guests = plan.max_guests,
                    requested_max_guests = max_guests,
                    reason = denial.reason.code(),
                    "invitations: guest limit exceeded"
                );
                denial
            })?;

        if let Some(template_id) = model.template_id {
            self.ensure_template_allowed(user_id, template_id, &plan).await?;
        }

        let now = Utc::now();
        let insert_invitation_entity = InsertInvitationEntity {
            organizer_id: user_id,
            template_id: model.template_id,
            title: model.title.trim().to_string(),
            description: model.description,
            event_date: model.event_date,
            location: model.location,
            max_guests,
            status: model.status.unwrap_or_default().to_string(),
            settings: model.settings.unwrap_or_else(|| serde_json::json!({})),
            created_at: now,
            updated_at: now,
        };

        let invitation = self
            .invitation_repo
            .create(insert_invitation_entity)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "invitations: failed to create invitation");
                InvitationError::Internal(err)
            })?;

        info!(
            %user_id,
            invitation_id = %invitation.id,
            plan_id = %plan.tier,
            "invitations: invitation created"
        );

        Ok(invitation.into())
    }

    /// Archived invitations stop counting toward the quota.
    pub async fn archive(&self, user_id: Uuid, invitation_id: Uuid) -> UseCaseResult<()> {
        let archived = self
            .invitation_repo
            .archive(invitation_id, user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %invitation_id,
                    db_error = ?err,
                    "invitations: failed to archive invitation"
                );
                InvitationError::Internal(err)
            })?;

        if !archived {
            debug!(%user_id, %invitation_id, "invitations: nothing to archive");
            return Err(InvitationError::InvitationNotFound);
        }

        info!(%user_id, %invitation_id, "invitations: invitation archived");
        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> UseCaseResult<()> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "invitations: failed to load user");
            InvitationError::Internal(err)
        })?;

        if user.is_none() {
            warn!(%user_id, "invitations: authenticated caller has no user record");
            return Err(InvitationError::UserNotFound);
        }

        Ok(())
    }

    async fn ensure_template_allowed(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        plan: &PlanEntity,
    ) -> UseCaseResult<()> {
        let template = self
            .template_repo
            .find_by_id(template_id)
            .await
            .map_err(|err| {
                error!(%user_id, %template_id, db_error = ?err, "invitations: failed to load template");
                InvitationError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, %template_id, "invitations: template not found");
                InvitationError::TemplateNotFound
            })?;

        EntitlementEvaluator::new(plan)
            .can_use_template(&template)
            .into_result()
            .map_err(|denial| {
                warn!(
                    %user_id,
                    %template_id,
                    plan_id = %plan.tier,
                    reason = denial.reason.code(),
                    "invitations: premium template requires upgrade"
                );
                InvitationError::from(denial)
            })
    }
}

fn validate_create_model(model: &CreateInvitationModel) -> UseCaseResult<()> {
    if model.title.trim().is_empty() {
        return Err(InvitationError::InvalidRequest(
            "title must not be empty".to_string(),
        ));
    }
    if model.max_guests.is_some_and(|max_guests| max_guests <= 0) {
        return Err(InvitationError::InvalidRequest(
            "maxGuests must be a positive number".to_string(),
        ));
    }
    if model.status == Some(InvitationStatus::Archived) {
        return Err(InvitationError::InvalidRequest(
            "new invitations cannot be archived".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::{
            app_users::AppUserEntity, invitations::InvitationEntity,
            subscriptions::SubscriptionEntity, templates::TemplateEntity,
        },
        repositories::{
            app_users::MockAppUserRepository, invitations::MockInvitationRepository,
            subscriptions::MockSubscriptionRepository, templates::MockTemplateRepository,
        },
        value_objects::{entitlements::EntitlementReason, plans::PlanCatalog},
    };
    use mockall::predicate::eq;

    type TestUseCase = InvitationsUseCase<
        MockInvitationRepository,
        MockTemplateRepository,
        MockAppUserRepository,
        MockSubscriptionRepository,
    >;

    struct Mocks {
        invitations: MockInvitationRepository,
        templates: MockTemplateRepository,
        users: MockAppUserRepository,
        subscriptions: MockSubscriptionRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                invitations: MockInvitationRepository::new(),
                templates: MockTemplateRepository::new(),
                users: MockAppUserRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
            }
        }

        fn with_user(mut self, user_id: Uuid) -> Self {
            self.users
                .expect_find_by_id()
                .with(eq(user_id))
                .returning(|id| {
                    Box::pin(async move {
                        Ok(Some(AppUserEntity {
                            id,
                            email: Some("host@example.com".to_string()),
                            created_at: Utc::now(),
                        }))
                    })
                });
            self
        }

        fn with_plan(mut self, user_id: Uuid, plan_id: Option<&'static str>) -> Self {
            let subscription = plan_id.map(|plan_id| sample_subscription(user_id, plan_id));
            self.subscriptions
                .expect_find_current_subscription()
                .with(eq(user_id))
                .returning(move |_| {
                    let subscription = subscription.clone();
                    Box::pin(async move { Ok(subscription) })
                });
            self
        }

        fn with_active_count(mut self, user_id: Uuid, count: i64) -> Self {
            self.invitations
                .expect_count_active_by_organizer()
                .with(eq(user_id))
                .returning(move |_| Box::pin(async move { Ok(count) }));
            self
        }

        fn with_template(mut self, template: TemplateEntity) -> Self {
            self.templates
                .expect_find_by_id()
                .with(eq(template.id))
                .returning(move |_| {
                    let template = template.clone();
                    Box::pin(async move { Ok(Some(template)) })
                });
            self
        }

        fn expecting_create(mut self) -> Self {
            self.invitations
                .expect_create()
                .times(1)
                .returning(|entity| Box::pin(async move { Ok(stored_invitation(entity)) }));
            self
        }

        fn expecting_no_create(mut self) -> Self {
            self.invitations.expect_create().never();
            self
        }

        fn build(self) -> TestUseCase {
            let plan_resolver = PlanResolver::new(
                Arc::new(self.subscriptions),
                Arc::new(PlanCatalog::standard()),
            );
            InvitationsUseCase::new(
                Arc::new(self.invitations),
                Arc::new(self.templates),
                Arc::new(self.users),
                Arc::new(plan_resolver),
            )
        }
    }

    fn sample_subscription(user_id: Uuid, plan_id: &str) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id: plan_id.to_string(),
            status: "active".to_string(),
            current_period_start: now - Duration::days(3),
            current_period_end: now + Duration::days(27),
            created_at: now - Duration::days(3),
        }
    }

    fn sample_template(is_premium: bool) -> TemplateEntity {
        TemplateEntity {
            id: Uuid::new_v4(),
            name: "Golden hour".to_string(),
            description: None,
            category: "wedding".to_string(),
            is_premium,
            creator_id: None,
            content: serde_json::json!({ "blocks": [] }),
            thumbnail_url: None,
            created_at: Utc::now(),
        }
    }

    fn stored_invitation(entity: InsertInvitationEntity) -> InvitationEntity {
        InvitationEntity {
            id: Uuid::new_v4(),
            organizer_id: entity.organizer_id,
            template_id: entity.template_id,
            title: entity.title,
            description: entity.description,
            event_date: entity.event_date,
            location: entity.location,
            max_guests: entity.max_guests,
            status: entity.status,
            settings: entity.settings,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    fn create_model(max_guests: Option<i32>, template_id: Option<Uuid>) -> CreateInvitationModel {
        CreateInvitationModel {
            title: "Ana & Ben".to_string(),
            description: None,
            event_date: None,
            location: Some("Lisbon".to_string()),
            max_guests,
            template_id,
            status: None,
            settings: None,
        }
    }

    #[tokio::test]
    async fn free_user_at_limit_is_rejected() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, None)
            .with_active_count(user_id, 10)
            .expecting_no_create()
            .build();

        let err = usecase
            .create(user_id, create_model(Some(20), None))
            .await
            .unwrap_err();

        match err {
            InvitationError::Entitlement(denial) => {
                assert_eq!(denial.reason, EntitlementReason::LimitReached)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn free_user_below_limit_creates_draft() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, None)
            .with_active_count(user_id, 9)
            .expecting_create()
            .build();

        let invitation = usecase
            .create(user_id, create_model(Some(50), None))
            .await
            .unwrap();

        assert_eq!(invitation.organizer_id, user_id);
        assert_eq!(invitation.max_guests, 50);
        assert_eq!(invitation.status, "draft");
        assert_eq!(invitation.settings, serde_json::json!({}));
    }

    #[tokio::test]
    async fn guest_count_over_plan_is_rejected() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, None)
            .with_active_count(user_id, 0)
            .expecting_no_create()
            .build();

        let err = usecase
            .create(user_id, create_model(Some(51), None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvitationError::Entitlement(EntitlementDenial {
                reason: EntitlementReason::GuestLimitExceeded,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn premium_user_can_use_full_guest_allowance() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, Some("premium"))
            .with_active_count(user_id, 12)
            .expecting_create()
            .build();

        let invitation = usecase
            .create(user_id, create_model(Some(500), None))
            .await
            .unwrap();

        assert_eq!(invitation.max_guests, 500);
    }

    #[tokio::test]
    async fn omitted_guest_count_defaults_to_plan_maximum() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, Some("business"))
            .with_active_count(user_id, 0)
            .expecting_create()
            .build();

        let invitation = usecase
            .create(user_id, create_model(None, None))
            .await
            .unwrap();

        assert_eq!(invitation.max_guests, 5000);
    }

    #[tokio::test]
    async fn free_user_cannot_use_premium_template() {
        let user_id = Uuid::new_v4();
        let template = sample_template(true);
        let template_id = template.id;
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, None)
            .with_active_count(user_id, 1)
            .with_template(template)
            .expecting_no_create()
            .build();

        let err = usecase
            .create(user_id, create_model(Some(10), Some(template_id)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvitationError::Entitlement(EntitlementDenial {
                reason: EntitlementReason::PremiumRequired,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn premium_user_can_use_premium_template() {
        let user_id = Uuid::new_v4();
        let template = sample_template(true);
        let template_id = template.id;
        let usecase = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, Some("premium"))
            .with_active_count(user_id, 1)
            .with_template(template)
            .expecting_create()
            .build();

        let invitation = usecase
            .create(user_id, create_model(Some(100), Some(template_id)))
            .await
            .unwrap();

        assert_eq!(invitation.template_id, Some(template_id));
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, Some("premium"))
            .with_active_count(user_id, 0)
            .expecting_no_create();
        mocks
            .templates
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let usecase = mocks.build();

        let err = usecase
            .create(user_id, create_model(Some(10), Some(Uuid::new_v4())))
            .await
            .unwrap_err();

        assert!(matches!(err, InvitationError::TemplateNotFound));
    }

    #[tokio::test]
    async fn missing_user_record_is_not_found() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new().expecting_no_create();
        mocks
            .users
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        mocks.subscriptions.expect_find_current_subscription().never();
        let usecase = mocks.build();

        let err = usecase
            .create(user_id, create_model(Some(10), None))
            .await
            .unwrap_err();

        assert!(matches!(err, InvitationError::UserNotFound));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_any_lookup() {
        let user_id = Uuid::new_v4();
        let usecase = Mocks::new().expecting_no_create().build();

        let mut blank_title = create_model(Some(10), None);
        blank_title.title = "   ".to_string();
        assert!(matches!(
            usecase.create(user_id, blank_title).await,
            Err(InvitationError::InvalidRequest(_))
        ));

        assert!(matches!(
            usecase.create(user_id, create_model(Some(0), None)).await,
            Err(InvitationError::InvalidRequest(_))
        ));

        let mut archived = create_model(Some(10), None);
        archived.status = Some(InvitationStatus::Archived);
        assert!(matches!(
            usecase.create(user_id, archived).await,
            Err(InvitationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn count_failure_is_internal() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new()
            .with_user(user_id)
            .with_plan(user_id, None)
            .expecting_no_create();
        mocks
            .invitations
            .expect_count_active_by_organizer()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection reset")) }));
        let usecase = mocks.build();

        let err = usecase
            .create(user_id, create_model(Some(10), None))
            .await
            .unwrap_err();

        assert!(matches!(err, InvitationError::Internal(_)));
    }

    #[tokio::test]
    async fn list_builds_pagination_from_total() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        let expected_filter = ListInvitationsFilter {
            organizer_id: user_id,
            status: Some(InvitationStatus::Published),
            limit: 2,
            offset: 0,
        };
        mocks
            .invitations
            .expect_list_by_organizer()
            .with(eq(expected_filter))
            .returning(move |filter| {
                let now = Utc::now();
                let rows = (0..filter.limit)
                    .map(|i| {
                        stored_invitation(InsertInvitationEntity {
                            organizer_id: filter.organizer_id,
                            template_id: None,
                            title: format!("Party {i}"),
                            description: None,
                            event_date: None,
                            location: None,
                            max_guests: 20,
                            status: "published".to_string(),
                            settings: serde_json::json!({}),
                            created_at: now,
                            updated_at: now,
                        })
                    })
                    .collect::<Vec<_>>();
                Box::pin(async move { Ok(rows) })
            });
        mocks
            .invitations
            .expect_count_by_organizer()
            .with(eq(user_id), eq(Some(InvitationStatus::Published)))
            .returning(|_, _| Box::pin(async { Ok(5) }));
        let usecase = mocks.build();

        let page = usecase
            .list(user_id, Some(InvitationStatus::Published), Some(2), None)
            .await
            .unwrap();

        assert_eq!(page.invitations.len(), 2);
        assert_eq!(page.pagination, Pagination::new(5, 2, 0));
        assert!(page.pagination.has_more);
    }

    #[tokio::test]
    async fn list_past_the_last_page_with_huge_offset_is_empty() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        mocks
            .invitations
            .expect_list_by_organizer()
            .returning(|_| Box::pin(async { Ok(vec![]) }));
        mocks
            .invitations
            .expect_count_by_organizer()
            .returning(|_, _| Box::pin(async { Ok(3) }));
        let usecase = mocks.build();

        let page = usecase
            .list(user_id, None, Some(10), Some(i64::MAX))
            .await
            .unwrap();

        assert!(page.invitations.is_empty());
        assert_eq!(page.pagination.total, 3);
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn list_rejects_out_of_range_paging() {
        let usecase = Mocks::new().build();
        let user_id = Uuid::new_v4();

        assert!(matches!(
            usecase.list(user_id, None, Some(0), None).await,
            Err(InvitationError::InvalidRequest(_))
        ));
        assert!(matches!(
            usecase.list(user_id, None, Some(MAX_LIST_LIMIT + 1), None).await,
            Err(InvitationError::InvalidRequest(_))
        ));
        assert!(matches!(
            usecase.list(user_id, None, None, Some(-1)).await,
            Err(InvitationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn archiving_someone_elses_invitation_is_not_found() {
        let user_id = Uuid::new_v4();
        let invitation_id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        mocks
            .invitations
            .expect_archive()
            .with(eq(invitation_id), eq(user_id))
            .returning(|_, _| Box::pin(async { Ok(false) }));
        let usecase = mocks.build();

        assert!(matches!(
            usecase.archive(user_id, invitation_id).await,
            Err(InvitationError::InvitationNotFound)
        ));
    }
}
