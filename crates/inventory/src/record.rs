use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use detailpro_core::{Aggregate, AggregateRoot, DomainError, ItemId};
use detailpro_events::Event;

use crate::input::{NewItem, line_value, positive_quantity};
use crate::status::{StockStatus, classify};

/// Aggregate root: one inventory line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    id: ItemId,
    name: String,
    category: String,
    unit: String,
    stock: u64,
    stock_in: u64,
    stock_out: u64,
    reorder_level: u64,
    price: Decimal,
    status: StockStatus,
    expected_delivery: Option<NaiveDate>,
    version: u64,
    created: bool,
}

impl StockRecord {
    /// Create an empty, not-yet-created record for the given id.
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            category: String::new(),
            unit: String::new(),
            stock: 0,
            stock_in: 0,
            stock_out: 0,
            reorder_level: 0,
            price: Decimal::ZERO,
            status: classify(0, 0),
            expected_delivery: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn stock_in(&self) -> u64 {
        self.stock_in
    }

    pub fn stock_out(&self) -> u64 {
        self.stock_out
    }

    pub fn reorder_level(&self) -> u64 {
        self.reorder_level
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn status(&self) -> StockStatus {
        self.status
    }

    /// Expected delivery date captured by the most recent reorder, if any.
    pub fn expected_delivery(&self) -> Option<NaiveDate> {
        self.expected_delivery
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for StockRecord {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Direction of a manual stock edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    Add,
    Deduct,
}

/// Command: CreateItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item_id: ItemId,
    pub item: NewItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReorderStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderStock {
    pub item_id: ItemId,
    pub quantity: i64,
    pub expected_delivery: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub item_id: ItemId,
    pub amount: i64,
    pub direction: AdjustmentDirection,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryCommand {
    CreateItem(CreateItem),
    ReorderStock(ReorderStock),
    AdjustStock(AdjustStock),
}

/// Event: ItemCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub stock: u64,
    pub stock_in: u64,
    pub stock_out: u64,
    pub reorder_level: u64,
    pub price: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockReordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReordered {
    pub item_id: ItemId,
    pub quantity: u64,
    pub expected_delivery: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub item_id: ItemId,
    pub quantity: u64,
    pub direction: AdjustmentDirection,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemCreated(ItemCreated),
    StockReordered(StockReordered),
    StockAdjusted(StockAdjusted),
}

impl InventoryEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            InventoryEvent::ItemCreated(e) => e.item_id,
            InventoryEvent::StockReordered(e) => e.item_id,
            InventoryEvent::StockAdjusted(e) => e.item_id,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemCreated(_) => "inventory.item.created",
            InventoryEvent::StockReordered(_) => "inventory.item.reordered",
            InventoryEvent::StockAdjusted(_) => "inventory.item.stock_adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemCreated(e) => e.occurred_at,
            InventoryEvent::StockReordered(e) => e.occurred_at,
            InventoryEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockRecord {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemCreated(e) => {
                self.id = e.item_id;
                self.name = e.name.clone();
                self.category = e.category.clone();
                self.unit = e.unit.clone();
                self.stock = e.stock;
                self.stock_in = e.stock_in;
                self.stock_out = e.stock_out;
                self.reorder_level = e.reorder_level;
                self.price = e.price;
                self.created = true;
            }
            InventoryEvent::StockReordered(e) => {
                self.stock += e.quantity;
                self.stock_in += e.quantity;
                self.expected_delivery = e.expected_delivery;
            }
            InventoryEvent::StockAdjusted(e) => match e.direction {
                AdjustmentDirection::Add => {
                    self.stock += e.quantity;
                    self.stock_in += e.quantity;
                }
                AdjustmentDirection::Deduct => {
                    self.stock -= e.quantity;
                    self.stock_out += e.quantity;
                }
            },
        }

        // Status only ever moves together with stock.
        self.status = classify(self.stock, self.reorder_level);
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::CreateItem(cmd) => self.handle_create(cmd),
            InventoryCommand::ReorderStock(cmd) => self.handle_reorder(cmd),
            InventoryCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
        }
    }
}

impl StockRecord {
    fn ensure_item_id(&self, item_id: ItemId) -> Result<(), DomainError> {
        if !self.created || self.id != item_id {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateItem) -> Result<Vec<InventoryEvent>, DomainError> {
        if self.created {
            return Err(DomainError::invalid_id(format!(
                "item {} already exists",
                cmd.item_id
            )));
        }
        let item = cmd.item.validate()?;

        Ok(vec![InventoryEvent::ItemCreated(ItemCreated {
            item_id: cmd.item_id,
            name: item.name,
            category: item.category,
            unit: item.unit,
            stock: item.stock,
            stock_in: item.stock_in,
            stock_out: item.stock_out,
            reorder_level: item.reorder_level,
            price: item.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reorder(&self, cmd: &ReorderStock) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_item_id(cmd.item_id)?;
        let quantity = positive_quantity("quantity", cmd.quantity)?;
        self.ensure_receivable(quantity)?;

        Ok(vec![InventoryEvent::StockReordered(StockReordered {
            item_id: cmd.item_id,
            quantity,
            expected_delivery: cmd.expected_delivery,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_item_id(cmd.item_id)?;
        let quantity = positive_quantity("amount", cmd.amount)?;

        match cmd.direction {
            AdjustmentDirection::Add => self.ensure_receivable(quantity)?,
            AdjustmentDirection::Deduct => {
                if quantity > self.stock {
                    return Err(DomainError::insufficient_stock(quantity, self.stock));
                }
                if self.stock_out.checked_add(quantity).is_none() {
                    return Err(DomainError::invalid_input("amount overflows stock-out counter"));
                }
            }
        }

        Ok(vec![InventoryEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            quantity,
            direction: cmd.direction,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn ensure_receivable(&self, quantity: u64) -> Result<(), DomainError> {
        let (Some(stock), Some(_)) = (
            self.stock.checked_add(quantity),
            self.stock_in.checked_add(quantity),
        ) else {
            return Err(DomainError::invalid_input("quantity overflows stock counters"));
        };
        line_value(stock, self.price)?;
        Ok(())
    }
}
