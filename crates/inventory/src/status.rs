//! Stock status tiers and the classifier that derives them.

use serde::{Deserialize, Serialize};

/// Derived stock tier of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Good,
    Low,
    Critical,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Good => "Good",
            StockStatus::Low => "Low",
            StockStatus::Critical => "Critical",
        }
    }

    /// `Low` and `Critical` items are flagged for restocking.
    pub fn needs_reorder(&self) -> bool {
        !matches!(self, StockStatus::Good)
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify on-hand stock against its reorder level.
///
/// First match wins:
/// 1. `stock <= reorder_level * 0.3` is `Critical`
/// 2. `stock <= reorder_level` is `Low`
/// 3. otherwise `Good`
///
/// The 30% threshold is compared as `10 * stock <= 3 * reorder_level` so the
/// boundary is exact for every integer input.
pub fn classify(stock: u64, reorder_level: u64) -> StockStatus {
    if u128::from(stock) * 10 <= u128::from(reorder_level) * 3 {
        StockStatus::Critical
    } else if stock <= reorder_level {
        StockStatus::Low
    } else {
        StockStatus::Good
    }
}
