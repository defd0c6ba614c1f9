//! Validated input for the "Add Item" form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use detailpro_core::{DomainError, DomainResult};

/// Unit label used when the form leaves `unit` blank.
pub const DEFAULT_UNIT: &str = "pcs";

/// Reorder level used when the form leaves it out.
pub const DEFAULT_REORDER_LEVEL: u64 = 10;

/// Raw "Add Item" input.
///
/// `name`, `category` and `stock` are required; everything else is optional
/// and defaulted once, in [`NewItem::validate`]. Numeric fields are signed so
/// that negative submissions are rejected as `InvalidInput` instead of
/// failing to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub stock: Option<i64>,
    pub stock_in: Option<i64>,
    pub stock_out: Option<i64>,
    pub unit: Option<String>,
    pub reorder_level: Option<i64>,
    pub price: Option<Decimal>,
}

/// Input after validation and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub stock: u64,
    pub stock_in: u64,
    pub stock_out: u64,
    pub reorder_level: u64,
    pub price: Decimal,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>, stock: i64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            stock: Some(stock),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_reorder_level(mut self, reorder_level: i64) -> Self {
        self.reorder_level = Some(reorder_level);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_counters(mut self, stock_in: i64, stock_out: i64) -> Self {
        self.stock_in = Some(stock_in);
        self.stock_out = Some(stock_out);
        self
    }

    /// Check required fields and apply defaults.
    pub fn validate(&self) -> DomainResult<ValidItem> {
        let name = required_text("name", &self.name)?;
        let category = required_text("category", &self.category)?;
        let stock = match self.stock {
            Some(v) => non_negative("stock", v)?,
            None => return Err(DomainError::invalid_input("stock is required")),
        };

        let unit = self
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT)
            .to_string();

        let reorder_level = match self.reorder_level {
            Some(v) => non_negative("reorder_level", v)?,
            None => DEFAULT_REORDER_LEVEL,
        };

        let price = self.price.unwrap_or(Decimal::ZERO);
        if price.is_sign_negative() && !price.is_zero() {
            return Err(DomainError::invalid_input("price cannot be negative"));
        }
        line_value(stock, price)?;

        Ok(ValidItem {
            name,
            category,
            unit,
            stock,
            stock_in: optional_count("stock_in", self.stock_in)?,
            stock_out: optional_count("stock_out", self.stock_out)?,
            reorder_level,
            price,
        })
    }
}

/// Parse a positive quantity (reorder or manual adjustment).
pub(crate) fn positive_quantity(field: &str, value: i64) -> DomainResult<u64> {
    if value <= 0 {
        return Err(DomainError::invalid_input(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(value.unsigned_abs())
}

/// `stock × price`, rejected when it does not fit in a `Decimal`.
pub(crate) fn line_value(stock: u64, price: Decimal) -> DomainResult<Decimal> {
    Decimal::from(stock)
        .checked_mul(price)
        .ok_or_else(|| DomainError::invalid_input("stock value (stock × price) is too large"))
}

fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: i64) -> DomainResult<u64> {
    u64::try_from(value)
        .map_err(|_| DomainError::invalid_input(format!("{field} cannot be negative")))
}

fn optional_count(field: &str, value: Option<i64>) -> DomainResult<u64> {
    value.map_or(Ok(0), |v| non_negative(field, v))
}
