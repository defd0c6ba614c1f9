//! Service wiring: the owned ledger, the event bus and the movement journal.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use detailpro_core::{DomainError, ItemId};
use detailpro_events::{EventBus, EventEnvelope, InMemoryEventBus};
use detailpro_inventory::{
    AdjustmentDirection, Committed, InventoryEvent, InventoryLedger, InventoryReport, Movement,
    NewItem, StockMovementJournal, StockRecord, ValuationSummary, low_stock,
};

use crate::app::accounts::{AccountStore, AuthError};
use crate::config::ApiConfig;

pub type InventoryBus = InMemoryEventBus<EventEnvelope<InventoryEvent>>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("inventory store unavailable")]
    Poisoned,
}

/// Everything the handlers need, shared behind an `Arc`.
///
/// The ledger sits behind a mutex so actions are applied one at a time, in
/// arrival order.
#[derive(Debug)]
pub struct AppServices {
    ledger: Mutex<InventoryLedger>,
    bus: Arc<InventoryBus>,
    journal: Arc<StockMovementJournal>,
    accounts: AccountStore,
    dashboard_url: String,
}

/// Build services and start the bus -> journal subscriber.
pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let mut ledger = InventoryLedger::new();
    let opening = if config.seed_catalog {
        ledger.seed_catalog()?
    } else {
        Vec::new()
    };

    let bus: Arc<InventoryBus> = Arc::new(InMemoryEventBus::new());
    let journal = Arc::new(StockMovementJournal::new());
    journal.rebuild_from_scratch(opening)?;

    // Background subscriber: bus -> journal. Ends once the bus is dropped.
    {
        let sub = bus.subscribe();
        let journal = journal.clone();
        std::thread::Builder::new()
            .name("inventory-journal".to_string())
            .spawn(move || {
                while let Ok(env) = sub.recv() {
                    if let Err(e) = journal.apply_envelope(&env) {
                        tracing::warn!("journal apply failed: {e}");
                    }
                }
                tracing::debug!("inventory bus closed; journal subscriber exiting");
            })?;
    }

    let accounts = AccountStore::new();
    accounts.register(&config.admin_user, &config.admin_password)?;

    tracing::info!(
        items = ledger.len(),
        seeded = config.seed_catalog,
        "inventory services ready"
    );

    Ok(AppServices {
        ledger: Mutex::new(ledger),
        bus,
        journal,
        accounts,
        dashboard_url: config.dashboard_url.clone(),
    })
}

impl AppServices {
    fn ledger(&self) -> Result<MutexGuard<'_, InventoryLedger>, ServiceError> {
        self.ledger.lock().map_err(|_| ServiceError::Poisoned)
    }

    /// Publish committed envelopes. Called with the ledger guard still held
    /// so envelopes reach the bus in sequence order. The ledger is already
    /// updated, so a failed publish is logged, not returned.
    fn publish(&self, committed: &Committed) {
        for env in &committed.envelopes {
            if let Err(e) = self.bus.publish(env.clone()) {
                tracing::warn!(item_id = %committed.item_id, "inventory publish failed: {e:?}");
            }
        }
    }

    pub fn list_items(&self) -> Result<Vec<StockRecord>, ServiceError> {
        Ok(self.ledger()?.list().to_vec())
    }

    pub fn get_item(&self, id: ItemId) -> Result<StockRecord, ServiceError> {
        Ok(self.ledger()?.get(id)?.clone())
    }

    pub fn create_item(&self, item: NewItem) -> Result<StockRecord, ServiceError> {
        let mut ledger = self.ledger()?;
        let committed = ledger.create(item)?;
        let record = ledger.get(committed.item_id)?.clone();
        self.publish(&committed);
        Ok(record)
    }

    pub fn reorder(
        &self,
        id: ItemId,
        quantity: i64,
        expected_delivery: Option<NaiveDate>,
    ) -> Result<StockRecord, ServiceError> {
        let mut ledger = self.ledger()?;
        let committed = ledger.reorder(id, quantity, expected_delivery)?;
        let record = ledger.get(id)?.clone();
        self.publish(&committed);
        Ok(record)
    }

    pub fn adjust(
        &self,
        id: ItemId,
        amount: i64,
        direction: AdjustmentDirection,
    ) -> Result<StockRecord, ServiceError> {
        let mut ledger = self.ledger()?;
        let committed = ledger.adjust(id, amount, direction)?;
        let record = ledger.get(id)?.clone();
        self.publish(&committed);
        Ok(record)
    }

    pub fn summary(&self) -> Result<ValuationSummary, ServiceError> {
        let records = self.list_items()?;
        Ok(ValuationSummary::from_records(&records))
    }

    pub fn low_stock(&self) -> Result<Vec<StockRecord>, ServiceError> {
        let records = self.list_items()?;
        Ok(low_stock(&records).into_iter().cloned().collect())
    }

    pub fn report(&self) -> Result<InventoryReport, ServiceError> {
        let records = self.list_items()?;
        Ok(InventoryReport::generate(&records, Utc::now()))
    }

    /// Movement history; the item must exist in the ledger.
    pub fn movements(&self, id: ItemId) -> Result<Vec<Movement>, ServiceError> {
        self.ledger()?.get(id)?;
        Ok(self.journal.movements(id))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.accounts.verify(username, password)
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.accounts.register(username, password)
    }

    pub fn dashboard_url(&self) -> &str {
        &self.dashboard_url
    }
}
