use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::{invitations::InvitationsUseCase, plan_resolver::PlanResolver},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            app_users::AppUserRepository, invitations::InvitationRepository,
            subscriptions::SubscriptionRepository, templates::TemplateRepository,
        },
        value_objects::{
            enums::invitation_statuses::InvitationStatus, invitations::CreateInvitationModel,
            plans::PlanCatalog,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            app_users::AppUserPostgres, invitations::InvitationPostgres,
            subscriptions::SubscriptionPostgres, templates::TemplatePostgres,
        },
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListInvitationsQuery {
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, plans: Arc<PlanCatalog>) -> Router {
    let invitation_repository = InvitationPostgres::new(Arc::clone(&db_pool));
    let template_repository = TemplatePostgres::new(Arc::clone(&db_pool));
    let user_repository = AppUserPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));

    let plan_resolver = PlanResolver::new(Arc::new(subscription_repository), plans);

    let usecase = InvitationsUseCase::new(
        Arc::new(invitation_repository),
        Arc::new(template_repository),
        Arc::new(user_repository),
        Arc::new(plan_resolver),
    );

    router(Arc::new(usecase))
}

pub fn router<I, T, U, S>(usecase: Arc<InvitationsUseCase<I, T, U, S>>) -> Router
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_invitations::<I, T, U, S>).post(create_invitation::<I, T, U, S>),
        )
        .route(
            "/:invitation_id",
            get(get_invitation::<I, T, U, S>).delete(archive_invitation::<I, T, U, S>),
        )
        .with_state(usecase)
}

pub async fn list_invitations<I, T, U, S>(
    State(usecase): State<Arc<InvitationsUseCase<I, T, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListInvitationsQuery>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, "invitations: list request received");

    let status = query
        .status
        .as_deref()
        .map(|status| InvitationStatus::try_from(status))
        .transpose()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let page = usecase
        .list(user_id, status, query.limit, query.offset)
        .await?;

    Ok(Json(page))
}

pub async fn create_invitation<I, T, U, S>(
    State(usecase): State<Arc<InvitationsUseCase<I, T, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreateInvitationModel>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, "invitations: create request received");

    let invitation = usecase.create(user_id, model).await?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

pub async fn get_invitation<I, T, U, S>(
    State(usecase): State<Arc<InvitationsUseCase<I, T, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    WithRejection(Path(invitation_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let invitation = usecase.get(user_id, invitation_id).await?;

    Ok(Json(invitation))
}

pub async fn archive_invitation<I, T, U, S>(
    State(usecase): State<Arc<InvitationsUseCase<I, T, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    WithRejection(Path(invitation_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Send + Sync + 'static,
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, %invitation_id, "invitations: archive request received");

    usecase.archive(user_id, invitation_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
