use axum::Router;

pub mod auth;
pub mod inventory;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/auth", auth::router())
}
