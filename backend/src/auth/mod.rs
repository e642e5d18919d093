use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejectionReason,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{axum_http::error_responses::AppError, config::config_model::Auth};

/// Claims we read from identity-provider tokens. `aud` and `exp` are checked by
/// `jsonwebtoken` during decoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Caller identity for routes that also serve anonymous visitors.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header")]
    InvalidHeader,
    #[error("JWT validation failed: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid user ID in token")]
    InvalidSubject,
}

#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(auth: &Auth) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&auth.audiences);

        Self {
            decoding_key: DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

fn verifier_from(parts: &Parts) -> Result<Arc<JwtVerifier>, AppError> {
    parts
        .extensions
        .get::<Arc<JwtVerifier>>()
        .cloned()
        .ok_or_else(|| {
            error!("auth: JwtVerifier extension is not installed on the router");
            AppError::Internal(anyhow::anyhow!("JwtVerifier extension missing"))
        })
}

async fn authenticate<S>(parts: &mut Parts, state: &S) -> Result<AuthUser, AppError>
where
    S: Send + Sync,
{
    let verifier = verifier_from(parts)?;

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let err = if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) {
                    AuthError::MissingHeader
                } else {
                    AuthError::InvalidHeader
                };
                debug!(error = %err, "auth: rejected Authorization header");
                AppError::from(err)
            })?;

    verifier.verify(bearer.token()).map_err(|err| {
        debug!(error = %err, "auth: rejected bearer token");
        AppError::from(err)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    /// No header means anonymous; a header that fails verification is still a 401.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }

        authenticate(parts, state).await.map(|user| MaybeAuthUser(Some(user)))
    }
}
