use std::sync::Arc;

use axum::{
    Extension, Router,
    body::{Body, to_bytes},
    http::{
        Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{auth::JwtVerifier, config::config_model::Auth};

const SECRET: &str = "router-test-secret-router-test-secret";

#[derive(Serialize)]
struct Claims {
    sub: String,
    role: String,
    aud: String,
    exp: usize,
}

pub(crate) fn with_verifier(router: Router) -> Router {
    let verifier = JwtVerifier::new(&Auth {
        jwt_secret: SECRET.to_string(),
        audiences: vec!["authenticated".to_string()],
    });
    router.layer(Extension(Arc::new(verifier)))
}

pub(crate) fn bearer(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        role: "authenticated".to_string(),
        aud: "authenticated".to_string(),
        exp: 9999999999,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

pub(crate) async fn send(
    router: Router,
    method: Method,
    uri: &str,
    authorization: Option<String>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        builder = builder.header(AUTHORIZATION, authorization);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
