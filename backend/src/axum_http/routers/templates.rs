use crate::{
    auth::{AuthUser, MaybeAuthUser},
    axum_http::error_responses::AppError,
    usecases::{
        plan_resolver::PlanResolver,
        templates::{TemplateQuery, TemplatesUseCase},
    },
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
            app_users::AppUserRepository, subscriptions::SubscriptionRepository,
            templates::TemplateRepository,
        },
        value_objects::{plans::PlanCatalog, templates::CreateTemplateModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            app_users::AppUserPostgres, subscriptions::SubscriptionPostgres,
            templates::TemplatePostgres,
        },
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesQuery {
    category: Option<String>,
    is_premium: Option<bool>,
    search: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, plans: Arc<PlanCatalog>) -> Router {
    let template_repository = TemplatePostgres::new(Arc::clone(&db_pool));
    let user_repository = AppUserPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));

    let plan_resolver = PlanResolver::new(Arc::new(subscription_repository), plans);

    let usecase = TemplatesUseCase::new(
        Arc::new(template_repository),
        Arc::new(user_repository),
        Arc::new(plan_resolver),
    );

    router(Arc::new(usecase))
}

pub fn router<T, U, S>(usecase: Arc<TemplatesUseCase<T, U, S>>) -> Router
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_templates::<T, U, S>).post(create_template::<T, U, S>),
        )
        .route("/:template_id", get(get_template::<T, U, S>))
        .with_state(usecase)
}

pub async fn list_templates<T, U, S>(
    State(usecase): State<Arc<TemplatesUseCase<T, U, S>>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ListTemplatesQuery>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let viewer = viewer.map(|auth| auth.user_id);
    info!(viewer = ?viewer, "templates: list request received");

    let templates = usecase
        .list(
            viewer,
            TemplateQuery {
                category: query.category,
                is_premium: query.is_premium,
                search: query.search,
            },
        )
        .await?;

    Ok(Json(templates))
}

pub async fn get_template<T, U, S>(
    State(usecase): State<Arc<TemplatesUseCase<T, U, S>>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    WithRejection(Path(template_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let template = usecase
        .get(viewer.map(|auth| auth.user_id), template_id)
        .await?;

    Ok(Json(template))
}

pub async fn create_template<T, U, S>(
    State(usecase): State<Arc<TemplatesUseCase<T, U, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    WithRejection(Json(model), _): WithRejection<Json<CreateTemplateModel>, AppError>,
) -> Result<impl IntoResponse, AppError>
where
    T: TemplateRepository + Send + Sync + 'static,
    U: AppUserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    info!(%user_id, "templates: create request received");

    let template = usecase.create(user_id, model).await?;

    Ok((StatusCode::CREATED, Json(template)))
}
