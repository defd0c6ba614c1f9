//! Mock sign-in routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::app::accounts::AuthError;
use crate::app::dto::{AuthResponse, CredentialsRequest};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/google", get(oauth_redirect))
        .route("/facebook", get(oauth_redirect))
}

fn auth_failure(err: AuthError) -> axum::response::Response {
    let status = match err {
        AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
        AuthError::UsernameTaken => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(AuthResponse::failed(err.to_string()))).into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return auth_failure(AuthError::MissingCredentials);
    };

    match services.login(&body.username, &body.password) {
        Ok(()) => {
            tracing::info!(username = body.username.trim(), "login succeeded");
            (StatusCode::OK, Json(AuthResponse::ok("Login successful"))).into_response()
        }
        Err(e) => {
            tracing::warn!(username = body.username.trim(), "login rejected: {e}");
            auth_failure(e)
        }
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return auth_failure(AuthError::MissingCredentials);
    };

    match services.register(&body.username, &body.password) {
        Ok(()) => {
            tracing::info!(username = body.username.trim(), "account registered");
            (StatusCode::CREATED, Json(AuthResponse::ok("Registration successful"))).into_response()
        }
        Err(e) => auth_failure(e),
    }
}

/// Stand-in for the OAuth provider round trip: straight to the dashboard.
pub async fn oauth_redirect(Extension(services): Extension<Arc<AppServices>>) -> Redirect {
    Redirect::to(services.dashboard_url())
}
