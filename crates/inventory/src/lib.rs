//! Inventory domain module.
//!
//! Business rules for the shop's stock: the status classifier, the ledger
//! that applies reorders and manual adjustments, and read-side valuation.
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod input;
pub mod journal;
pub mod ledger;
pub mod record;
pub mod report;
pub mod seed;
pub mod status;
pub mod valuation;

pub use input::{DEFAULT_REORDER_LEVEL, DEFAULT_UNIT, NewItem, ValidItem};
pub use journal::{JournalError, Movement, MovementKind, StockMovementJournal};
pub use ledger::{AGGREGATE_TYPE, Committed, InventoryLedger};
pub use record::{
    AdjustStock, AdjustmentDirection, CreateItem, InventoryCommand, InventoryEvent, ItemCreated,
    ReorderStock, StockAdjusted, StockRecord, StockReordered,
};
pub use report::{InventoryReport, ReportLine};
pub use status::{StockStatus, classify};
pub use valuation::{ValuationSummary, item_value, low_stock, total_stock_in, total_stock_out, total_value};
