//! The inventory ledger: an explicitly owned, ordered store of stock records
//! and the operations that mutate it.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use detailpro_core::{AggregateRoot, DomainError, DomainResult, ItemId};
use detailpro_events::{EventEnvelope, execute};

use crate::input::NewItem;
use crate::record::{
    AdjustStock, AdjustmentDirection, CreateItem, InventoryCommand, InventoryEvent, ReorderStock,
    StockRecord,
};
use crate::valuation::item_value;

/// Aggregate type tag carried by every inventory envelope.
pub const AGGREGATE_TYPE: &str = "inventory.item";

/// Outcome of a successful ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub item_id: ItemId,
    pub envelopes: Vec<EventEnvelope<InventoryEvent>>,
}

/// In-memory inventory store.
///
/// Records keep their insertion order; no operation re-sorts or removes them.
/// Every mutation targets exactly one record and either commits fully or
/// leaves the store untouched.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    records: Vec<StockRecord>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in store order.
    pub fn list(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn get(&self, id: ItemId) -> DomainResult<&StockRecord> {
        self.records
            .iter()
            .find(|r| r.id_typed() == id)
            .ok_or(DomainError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Next id: current max + 1, so ids stay unique and grow monotonically.
    fn next_id(&self) -> ItemId {
        self.records
            .iter()
            .map(StockRecord::id_typed)
            .max()
            .map_or(ItemId::new(1), |id| id.next())
    }

    /// "Add Item".
    pub fn create(&mut self, item: NewItem) -> DomainResult<Committed> {
        let item_id = self.next_id();
        let mut record = StockRecord::empty(item_id);
        let cmd = InventoryCommand::CreateItem(CreateItem {
            item_id,
            item,
            occurred_at: Utc::now(),
        });

        let events = execute(&mut record, &cmd)
            .and_then(|events| self.ensure_total_value(None, &record).map(|()| events))
            .inspect_err(|e| {
                warn!(error = %e, "inventory item rejected");
            })?;
        let envelopes = envelopes_for(item_id, 0, events);

        info!(
            item_id = %item_id,
            name = record.name(),
            stock = record.stock(),
            status = %record.status(),
            "inventory item created"
        );

        self.records.push(record);
        Ok(Committed { item_id, envelopes })
    }

    /// "Reorder": receive `quantity` units.
    pub fn reorder(
        &mut self,
        id: ItemId,
        quantity: i64,
        expected_delivery: Option<NaiveDate>,
    ) -> DomainResult<Committed> {
        let cmd = InventoryCommand::ReorderStock(ReorderStock {
            item_id: id,
            quantity,
            expected_delivery,
            occurred_at: Utc::now(),
        });
        self.dispatch(id, &cmd)
    }

    /// "Edit Stock": manual add or deduct.
    pub fn adjust(
        &mut self,
        id: ItemId,
        amount: i64,
        direction: AdjustmentDirection,
    ) -> DomainResult<Committed> {
        let cmd = InventoryCommand::AdjustStock(AdjustStock {
            item_id: id,
            amount,
            direction,
            occurred_at: Utc::now(),
        });
        self.dispatch(id, &cmd)
    }

    fn dispatch(&mut self, id: ItemId, cmd: &InventoryCommand) -> DomainResult<Committed> {
        let Some(index) = self.records.iter().position(|r| r.id_typed() == id) else {
            debug!(item_id = %id, "inventory item not found");
            return Err(DomainError::NotFound);
        };

        // Work on a copy; the stored record is only replaced once every check passed.
        let mut record = self.records[index].clone();
        let base_version = record.version();
        let events = execute(&mut record, cmd)
            .and_then(|events| self.ensure_total_value(Some(index), &record).map(|()| events))
            .inspect_err(|e| {
                warn!(item_id = %id, error = %e, "inventory command rejected");
            })?;

        info!(
            item_id = %id,
            stock = record.stock(),
            stock_in = record.stock_in(),
            stock_out = record.stock_out(),
            status = %record.status(),
            version = record.version(),
            "inventory stock updated"
        );

        self.records[index] = record;
        Ok(Committed {
            item_id: id,
            envelopes: envelopes_for(id, base_version, events),
        })
    }

    /// The store's total value must stay representable with `candidate`
    /// in place of the record at `replacing`.
    fn ensure_total_value(&self, replacing: Option<usize>, candidate: &StockRecord) -> DomainResult<()> {
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .try_fold(item_value(candidate), |acc, (_, r)| acc.checked_add(item_value(r)))
            .map(|_| ())
            .ok_or_else(|| DomainError::invalid_input("total inventory value is too large"))
    }
}

fn envelopes_for(
    item_id: ItemId,
    base_version: u64,
    events: Vec<InventoryEvent>,
) -> Vec<EventEnvelope<InventoryEvent>> {
    events
        .into_iter()
        .zip(base_version + 1..)
        .map(|(event, seq)| EventEnvelope::new(Uuid::now_v7(), item_id, AGGREGATE_TYPE, seq, event))
        .collect()
}
