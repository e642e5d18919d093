use std::{env, str::FromStr};

use anyhow::{Context, Result, anyhow};
use crates::domain::value_objects::{
    enums::plan_tiers::PlanTier,
    plans::{PlanCatalog, PlanLimitOverrides},
};

use super::config_model::{Auth, BackendServer, Database, DotEnvyConfig};

const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

/// Reads the process environment; `.env` is loaded once by `main` beforehand.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| env::var(key).ok())
}

pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let backend_server = BackendServer {
        port: required_parse(&lookup, "SERVER_PORT_BACKEND")?,
        body_limit: required_parse(&lookup, "SERVER_BODY_LIMIT")?,
        timeout: required_parse(&lookup, "SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required(&lookup, "DATABASE_URL")?,
    };

    let audiences = lookup("AUTH_JWT_AUDIENCE")
        .unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_string())
        .split(',')
        .map(|aud| aud.trim().to_string())
        .filter(|aud| !aud.is_empty())
        .collect::<Vec<_>>();

    let auth = Auth {
        jwt_secret: required(&lookup, "AUTH_JWT_SECRET")?,
        audiences,
    };

    let mut plans = PlanCatalog::standard();
    for tier in PlanTier::ALL {
        plans = plans.with_overrides(tier, plan_overrides(&lookup, tier)?);
    }

    Ok(DotEnvyConfig {
        backend_server,
        database,
        auth,
        plans,
    })
}

fn plan_overrides<F>(lookup: &F, tier: PlanTier) -> Result<PlanLimitOverrides>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("PLAN_{}", tier.to_string().to_ascii_uppercase());

    let max_invitations: Option<i64> = optional_parse(lookup, &format!("{prefix}_MAX_INVITATIONS"))?;
    let max_guests: Option<i32> = optional_parse(lookup, &format!("{prefix}_MAX_GUESTS"))?;

    if max_invitations.is_some_and(|v| v < 0) || max_guests.is_some_and(|v| v < 0) {
        return Err(anyhow!("{prefix} limits must not be negative"));
    }

    Ok(PlanLimitOverrides {
        max_invitations,
        max_guests,
    })
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{key} is invalid"))
}

fn required_parse<F, T>(lookup: &F, key: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required(lookup, key)?
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} is invalid"))
}

fn optional_parse<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} is invalid")),
        None => Ok(None),
    }
}
