//! Starting catalog for a freshly opened shop.

use rust_decimal::Decimal;

use detailpro_core::DomainResult;
use detailpro_events::EventEnvelope;

use crate::input::NewItem;
use crate::ledger::InventoryLedger;
use crate::record::InventoryEvent;

/// (name, category, stock, stock in, stock out, unit, reorder level, price)
type SeedRow = (&'static str, &'static str, i64, i64, i64, &'static str, i64, i64);

const CATALOG: [SeedRow; 6] = [
    ("Ceramic Coating 9H", "Coating", 15, 20, 5, "bottles", 10, 3500),
    ("PPF Roll - Clear", "PPF", 3, 8, 5, "rolls", 5, 25000),
    ("Microfiber Towels", "Supplies", 45, 60, 15, "pcs", 30, 150),
    ("Polishing Compound", "Detailing", 8, 20, 12, "bottles", 15, 1200),
    ("Window Tint Film", "Tinting", 12, 15, 3, "rolls", 8, 5000),
    ("Tire Shine", "Detailing", 2, 12, 10, "bottles", 10, 450),
];

/// The catalog as "Add Item" inputs, in display order.
pub fn catalog() -> Vec<NewItem> {
    CATALOG
        .iter()
        .map(|&(name, category, stock, stock_in, stock_out, unit, reorder_level, price)| {
            NewItem::new(name, category, stock)
                .with_counters(stock_in, stock_out)
                .with_unit(unit)
                .with_reorder_level(reorder_level)
                .with_price(Decimal::from(price))
        })
        .collect()
}

impl InventoryLedger {
    /// Ledger pre-populated with [`catalog`]; statuses are derived on creation.
    pub fn seeded() -> DomainResult<Self> {
        let mut ledger = Self::new();
        ledger.seed_catalog()?;
        Ok(ledger)
    }

    /// Add every catalog item, returning the creation envelopes in order.
    pub fn seed_catalog(&mut self) -> DomainResult<Vec<EventEnvelope<InventoryEvent>>> {
        let mut envelopes = Vec::with_capacity(CATALOG.len());
        for item in catalog() {
            envelopes.extend(self.create(item)?.envelopes);
        }
        Ok(envelopes)
    }
}
