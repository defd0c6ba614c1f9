//! Printable inventory report: stock levels, movements and value per item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use detailpro_core::ItemId;

use crate::record::StockRecord;
use crate::status::StockStatus;
use crate::valuation::{self, ValuationSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub stock: u64,
    pub unit: String,
    pub stock_in: u64,
    pub stock_out: u64,
    pub value: Decimal,
    pub status: StockStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ValuationSummary,
    pub lines: Vec<ReportLine>,
}

impl InventoryReport {
    pub fn generate(records: &[StockRecord], generated_at: DateTime<Utc>) -> Self {
        let lines = records
            .iter()
            .map(|r| ReportLine {
                item_id: r.id_typed(),
                name: r.name().to_string(),
                category: r.category().to_string(),
                stock: r.stock(),
                unit: r.unit().to_string(),
                stock_in: r.stock_in(),
                stock_out: r.stock_out(),
                value: valuation::item_value(r),
                status: r.status(),
            })
            .collect();

        Self {
            generated_at,
            summary: ValuationSummary::from_records(records),
            lines,
        }
    }
}

impl core::fmt::Display for InventoryReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Inventory Report ({})", self.generated_at.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(
            f,
            "Total Items: {}  Total Stock In: {}  Total Stock Out: {}  Total Value: {}",
            self.summary.total_items,
            self.summary.total_stock_in,
            self.summary.total_stock_out,
            self.summary.total_value,
        )?;
        writeln!(
            f,
            "{:<24} {:>14} {:>6} {:>6} {:>12} {:<8}",
            "Item", "Stock", "In", "Out", "Value", "Status"
        )?;
        for line in &self.lines {
            let stock = format!("{} {}", line.stock, line.unit);
            writeln!(
                f,
                "{:<24} {:>14} {:>6} {:>6} {:>12} {:<8}",
                line.name, stock, line.stock_in, line.stock_out, line.value, line.status
            )?;
        }
        Ok(())
    }
}
