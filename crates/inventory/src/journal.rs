//! Stock movement journal.
//!
//! Consumes published inventory envelopes and keeps an append-only movement
//! history per item. Disposable and rebuildable from the envelopes.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use detailpro_core::ItemId;
use detailpro_events::{Event, EventEnvelope};

use crate::ledger::AGGREGATE_TYPE;
use crate::record::{AdjustmentDirection, InventoryEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Opening stock recorded when the item was added.
    Received,
    Reordered,
    Added,
    Deducted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movement {
    pub sequence: u64,
    pub kind: MovementKind,
    pub quantity: u64,
    pub stock_after: u64,
    pub expected_delivery: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("envelope aggregate_id does not match event item_id")]
    StreamMismatch,

    #[error("non-monotonic sequence number (last={last}, found={found})")]
    NonMonotonicSequence { last: u64, found: u64 },

    /// The movement would take the running stock below zero or past `u64::MAX`.
    #[error("stock out of range for item {item_id} at sequence {sequence}")]
    StockOutOfRange { item_id: ItemId, sequence: u64 },

    #[error("journal lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct ItemHistory {
    cursor: u64,
    stock: u64,
    movements: Vec<Movement>,
}

#[derive(Debug, Default)]
pub struct StockMovementJournal {
    items: RwLock<HashMap<ItemId, ItemHistory>>,
}

impl StockMovementJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Movements for one item, oldest first.
    pub fn movements(&self, item_id: ItemId) -> Vec<Movement> {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(&item_id).map(|h| h.movements.clone()))
            .unwrap_or_default()
    }

    /// Last applied sequence number for an item (0 if none).
    pub fn cursor(&self, item_id: ItemId) -> u64 {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(&item_id).map(|h| h.cursor))
            .unwrap_or(0)
    }

    /// Apply a published envelope.
    ///
    /// - Ignores envelopes of other aggregate types
    /// - Idempotent for at-least-once delivery (sequence <= cursor is skipped)
    /// - Rejects gaps and zero sequence numbers
    /// - Rejects movements the running stock cannot absorb; the cursor stays put
    pub fn apply_envelope(&self, envelope: &EventEnvelope<InventoryEvent>) -> Result<(), JournalError> {
        if envelope.aggregate_type() != AGGREGATE_TYPE {
            return Ok(());
        }

        let event = envelope.payload();
        let item_id = envelope.aggregate_id();
        if event.item_id() != item_id {
            return Err(JournalError::StreamMismatch);
        }

        let mut items = self.items.write().map_err(|_| JournalError::Poisoned)?;
        let history = items.entry(item_id).or_default();
        let seq = envelope.sequence_number();
        let last = history.cursor;

        if seq == 0 {
            return Err(JournalError::NonMonotonicSequence { last, found: seq });
        }
        if seq <= last {
            return Ok(());
        }
        if seq != last + 1 {
            return Err(JournalError::NonMonotonicSequence { last, found: seq });
        }

        let (kind, quantity, expected_delivery, stock_after) = match event {
            InventoryEvent::ItemCreated(e) => (MovementKind::Received, e.stock, None, Some(e.stock)),
            InventoryEvent::StockReordered(e) => (
                MovementKind::Reordered,
                e.quantity,
                e.expected_delivery,
                history.stock.checked_add(e.quantity),
            ),
            InventoryEvent::StockAdjusted(e) => match e.direction {
                AdjustmentDirection::Add => (
                    MovementKind::Added,
                    e.quantity,
                    None,
                    history.stock.checked_add(e.quantity),
                ),
                AdjustmentDirection::Deduct => (
                    MovementKind::Deducted,
                    e.quantity,
                    None,
                    history.stock.checked_sub(e.quantity),
                ),
            },
        };
        let Some(stock_after) = stock_after else {
            return Err(JournalError::StockOutOfRange { item_id, sequence: seq });
        };
        history.stock = stock_after;

        history.movements.push(Movement {
            sequence: seq,
            kind,
            quantity,
            stock_after: history.stock,
            expected_delivery,
            occurred_at: event.occurred_at(),
        });
        history.cursor = seq;

        Ok(())
    }

    /// Drop all history and replay the given envelopes in stream order.
    pub fn rebuild_from_scratch(
        &self,
        envelopes: impl IntoIterator<Item = EventEnvelope<InventoryEvent>>,
    ) -> Result<(), JournalError> {
        self.items.write().map_err(|_| JournalError::Poisoned)?.clear();

        let mut envs: Vec<_> = envelopes.into_iter().collect();
        envs.sort_by_key(|e| (e.aggregate_id(), e.sequence_number()));

        for env in &envs {
            self.apply_envelope(env)?;
        }
        Ok(())
    }
}
