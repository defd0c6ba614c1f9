//! Read-side aggregates over a ledger snapshot.
//!
//! Everything here is recomputed from the records on each call; nothing is
//! cached or maintained incrementally.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::record::StockRecord;

/// Display value of one line: `stock × price`.
///
/// Records committed through [`crate::InventoryLedger`] always fit; the
/// saturating arithmetic only guards records assembled by hand.
pub fn item_value(record: &StockRecord) -> Decimal {
    Decimal::from(record.stock()).saturating_mul(record.price())
}

/// `Σ stock × price`.
pub fn total_value(records: &[StockRecord]) -> Decimal {
    records
        .iter()
        .map(item_value)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Counters are `u64` per record; the sum is widened so it cannot wrap.
pub fn total_stock_in(records: &[StockRecord]) -> u128 {
    records.iter().map(|r| u128::from(r.stock_in())).sum()
}

pub fn total_stock_out(records: &[StockRecord]) -> u128 {
    records.iter().map(|r| u128::from(r.stock_out())).sum()
}

/// Records whose status is not `Good`, in store order.
pub fn low_stock(records: &[StockRecord]) -> Vec<&StockRecord> {
    records.iter().filter(|r| r.status().needs_reorder()).collect()
}

/// Dashboard headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationSummary {
    pub total_items: usize,
    pub low_stock_items: usize,
    pub total_value: Decimal,
    pub total_stock_in: u128,
    pub total_stock_out: u128,
}

impl ValuationSummary {
    pub fn from_records(records: &[StockRecord]) -> Self {
        Self {
            total_items: records.len(),
            low_stock_items: low_stock(records).len(),
            total_value: total_value(records),
            total_stock_in: total_stock_in(records),
            total_stock_out: total_stock_out(records),
        }
    }
}
