use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use detailpro_core::ItemId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item))
        .route("/items/:id/reorder", post(reorder_item))
        .route("/items/:id/adjust", post(adjust_stock))
        .route("/items/:id/movements", get(get_movements))
        .route("/summary", get(get_summary))
        .route("/low-stock", get(get_low_stock))
        .route("/report", get(get_report))
}

fn parse_id(id: &str) -> Result<ItemId, axum::response::Response> {
    id.parse()
        .map_err(errors::domain_error_to_response)
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.list_items() {
        Ok(items) => (StatusCode::OK, Json(dto::items_to_json(&items))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::json_rejection_to_response(rej),
    };

    match services.create_item(body) {
        Ok(record) => (StatusCode::CREATED, Json(dto::item_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_item(id) {
        Ok(record) => (StatusCode::OK, Json(dto::item_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn reorder_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ReorderRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::json_rejection_to_response(rej),
    };
    let quantity = match body.quantity() {
        Ok(q) => q,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.reorder(id, quantity, body.expected_delivery) {
        Ok(record) => (StatusCode::OK, Json(dto::item_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::AdjustStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::json_rejection_to_response(rej),
    };
    let amount = match body.amount() {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.adjust(id, amount, body.direction()) {
        Ok(record) => (StatusCode::OK, Json(dto::item_to_json(&record))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.movements(id) {
        Ok(moves) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "item_id": id,
                "count": moves.len(),
                "movements": moves,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_low_stock(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.low_stock() {
        Ok(items) => (StatusCode::OK, Json(dto::items_to_json(&items))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// JSON by default; `?format=text` returns the printable table.
pub async fn get_report(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ReportQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rej) => return errors::query_rejection_to_response(rej),
    };

    let report = match services.report() {
        Ok(r) => r,
        Err(e) => return errors::service_error_to_response(e),
    };

    match query.format.as_deref() {
        None | Some("json") => (StatusCode::OK, Json(report)).into_response(),
        Some("text") => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.to_string(),
        )
            .into_response(),
        Some(other) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            format!("unsupported report format: {other}"),
        ),
    }
}
