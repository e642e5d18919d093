use anyhow::{Context, Result};
use backend::{axum_http::http_serve, config::config_loader};
use crates::{
    domain::value_objects::enums::plan_tiers::PlanTier,
    infra::db::postgres::postgres_connection,
    observability::init_observability,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(err) = serve_invitations_api().await {
        error!(error = ?err, "backend: shutting down after fatal error");
        std::process::exit(1);
    }
}

async fn serve_invitations_api() -> Result<()> {
    dotenvy::dotenv().ok();
    init_observability("backend")?;

    let config = config_loader::load().context("backend: invalid configuration")?;
    for tier in PlanTier::ALL {
        let plan = config.plans.get(tier);
        info!(
            plan_id = %tier,
            max_invitations = plan.max_invitations,
            max_guests = plan.max_guests,
            premium_templates = plan.allows_premium_templates,
            "backend: plan limits loaded"
        );
    }

    let db_pool = postgres_connection::establish_connection(&config.database.url)
        .context("backend: cannot open postgres pool")?;
    info!(
        port = config.backend_server.port,
        "backend: postgres pool ready, starting http server"
    );

    http_serve::start(Arc::new(config), Arc::new(db_pool)).await
}
