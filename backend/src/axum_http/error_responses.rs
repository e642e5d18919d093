use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::domain::value_objects::entitlements::{EntitlementDenial, EntitlementReason};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{
    auth::AuthError,
    usecases::{invitations::InvitationError, templates::TemplateError},
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EntitlementReason>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Forbidden(#[from] EntitlementDenial),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, reason, message) = match self {
            AppError::Unauthorized => (
                "Unauthorized".to_string(),
                None,
                "Authentication required".to_string(),
            ),
            AppError::BadRequest(msg) => ("Bad request".to_string(), None, msg),
            AppError::NotFound(msg) => ("Not found".to_string(), None, msg),
            AppError::Forbidden(denial) => (
                denial.reason.title().to_string(),
                Some(denial.reason),
                denial.message,
            ),
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                // Don't leak internal error detail to client
                (
                    "Internal server error".to_string(),
                    None,
                    "Something went wrong, please try again later".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            error,
            reason,
            message,
        });

        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Unauthorized
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<InvitationError> for AppError {
    fn from(err: InvitationError) -> Self {
        match err {
            InvitationError::UserNotFound
            | InvitationError::TemplateNotFound
            | InvitationError::InvitationNotFound => AppError::NotFound(err.to_string()),
            InvitationError::InvalidRequest(msg) => AppError::BadRequest(msg),
            InvitationError::Entitlement(denial) => AppError::Forbidden(denial),
            InvitationError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UserNotFound | TemplateError::TemplateNotFound => {
                AppError::NotFound(err.to_string())
            }
            TemplateError::InvalidRequest(msg) => AppError::BadRequest(msg),
            TemplateError::Entitlement(denial) => AppError::Forbidden(denial),
            TemplateError::Internal(err) => AppError::Internal(err),
        }
    }
}
