use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use detailpro_core::{AggregateRoot, DomainError, DomainResult};
use detailpro_inventory::{AdjustmentDirection, StockRecord, item_value};

// -------------------------
// Request DTOs
// -------------------------

/// "Add Item" uses [`detailpro_inventory::NewItem`] directly.
pub use detailpro_inventory::NewItem as CreateItemRequest;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReorderRequest {
    pub quantity: Option<i64>,
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdjustStockRequest {
    pub amount: Option<i64>,
    pub direction: Option<AdjustmentDirection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

impl ReorderRequest {
    pub fn quantity(&self) -> DomainResult<i64> {
        self.quantity
            .ok_or_else(|| DomainError::invalid_input("quantity is required"))
    }
}

impl AdjustStockRequest {
    pub fn amount(&self) -> DomainResult<i64> {
        self.amount
            .ok_or_else(|| DomainError::invalid_input("amount is required"))
    }

    /// Defaults to `add`, like the edit form.
    pub fn direction(&self) -> AdjustmentDirection {
        self.direction.unwrap_or(AdjustmentDirection::Add)
    }
}

// -------------------------
// Response mapping
// -------------------------

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub fn item_to_json(record: &StockRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id_typed(),
        "name": record.name(),
        "category": record.category(),
        "unit": record.unit(),
        "stock": record.stock(),
        "stock_in": record.stock_in(),
        "stock_out": record.stock_out(),
        "reorder_level": record.reorder_level(),
        "price": record.price(),
        "value": item_value(record),
        "status": record.status(),
        "expected_delivery": record.expected_delivery(),
        "version": record.version(),
    })
}

pub fn items_to_json(records: &[StockRecord]) -> serde_json::Value {
    serde_json::Value::Array(records.iter().map(item_to_json).collect())
}
