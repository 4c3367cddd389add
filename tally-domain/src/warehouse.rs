//! Warehouse stock: electronics and groceries in separate repositories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Entity, RepoError, Repository, SnapshotStore, Storage};

use crate::error::DomainResult;
use crate::manager::{load_repo, save_repo, FlushPolicy};
use crate::stock::{self, check_quantity, Stocked};

pub const ELECTRONICS_DOC: &str = "electronics";
pub const GROCERIES_DOC: &str = "groceries";

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicItem {
    pub id: u32,
    pub name: String,
    pub quantity: i32,
    pub brand: String,
    pub warranty_months: u32,
}

impl ElectronicItem {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        quantity: i32,
        brand: impl Into<String>,
        warranty_months: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            brand: brand.into(),
            warranty_months,
        }
    }
}

impl Entity for ElectronicItem {
    type Id = u32;
    const KIND: &'static str = "electronic item";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Stocked for ElectronicItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }

    fn with_quantity(&self, quantity: i32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: u32,
    pub name: String,
    pub quantity: i32,
    pub expiry_date: NaiveDate,
}

impl GroceryItem {
    pub fn new(id: u32, name: impl Into<String>, quantity: i32, expiry_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            expiry_date,
        }
    }
}

impl Entity for GroceryItem {
    type Id = u32;
    const KIND: &'static str = "grocery item";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Stocked for GroceryItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }

    fn with_quantity(&self, quantity: i32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Section selector
// ---------------------------------------------------------------------------

/// Which repository a warehouse verb targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Electronics,
    Groceries,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Electronics => write!(f, "electronics"),
            Section::Groceries => write!(f, "groceries"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "electronics" | "electronic" => Ok(Section::Electronics),
            "groceries" | "grocery" => Ok(Section::Groceries),
            other => Err(format!(
                "unknown section '{other}'; expected: electronics, groceries"
            )),
        }
    }
}

/// Stock level of one item after a warehouse verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub section: Section,
    pub id: u32,
    pub name: String,
    pub quantity: i32,
}

impl StockLevel {
    fn of<T: Stocked<Id = u32>>(section: Section, item: &T) -> Self {
        Self {
            section,
            id: item.id(),
            name: item.name().to_string(),
            quantity: item.quantity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Owns the electronics and grocery repositories.
#[derive(Debug)]
pub struct WarehouseManager<S> {
    electronics: Repository<ElectronicItem>,
    groceries: Repository<GroceryItem>,
    store: SnapshotStore<S>,
    flush: FlushPolicy,
}

impl<S: Storage> WarehouseManager<S> {
    pub fn new(store: SnapshotStore<S>) -> Self {
        Self {
            electronics: Repository::new(),
            groceries: Repository::new(),
            store,
            flush: FlushPolicy::default(),
        }
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    /// Add the fixed sample stock, dating groceries relative to `now`.
    ///
    /// Not idempotent: a second call fails with `DuplicateKey`.
    pub fn seed_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        let today = now.date_naive();
        let in_a_year = today.checked_add_months(Months::new(12)).unwrap_or(today);
        let in_ten_days = today.checked_add_days(Days::new(10)).unwrap_or(today);

        self.electronics
            .add(ElectronicItem::new(1, "Laptop", 10, "Dell", 24))?;
        self.electronics
            .add(ElectronicItem::new(2, "Smartphone", 15, "Samsung", 12))?;
        self.groceries.add(GroceryItem::new(1, "Rice", 50, in_a_year))?;
        self.groceries.add(GroceryItem::new(2, "Milk", 20, in_ten_days))?;
        tracing::info!("warehouse seeded");
        self.after_change()
    }

    /// [`Self::seed_at`] using the current time.
    pub fn seed(&mut self) -> DomainResult<()> {
        self.seed_at(Utc::now())
    }

    pub fn add_electronic(&mut self, item: ElectronicItem) -> DomainResult<()> {
        check_quantity::<ElectronicItem>(item.quantity)?;
        self.electronics.add(item)?;
        self.after_change()
    }

    pub fn add_grocery(&mut self, item: GroceryItem) -> DomainResult<()> {
        check_quantity::<GroceryItem>(item.quantity)?;
        self.groceries.add(item)?;
        self.after_change()
    }

    /// Add `amount` to the stock of `id` in `section`.
    pub fn increase_stock(
        &mut self,
        section: Section,
        id: u32,
        amount: i32,
    ) -> DomainResult<StockLevel> {
        let level = match section {
            Section::Electronics => {
                StockLevel::of(section, stock::increase_stock(&mut self.electronics, id, amount)?)
            }
            Section::Groceries => {
                StockLevel::of(section, stock::increase_stock(&mut self.groceries, id, amount)?)
            }
        };
        tracing::info!(%section, id, quantity = level.quantity, "stock increased");
        self.after_change()?;
        Ok(level)
    }

    /// Set the stock of `id` in `section` to `quantity` (>= 0).
    pub fn update_quantity(
        &mut self,
        section: Section,
        id: u32,
        quantity: i32,
    ) -> DomainResult<StockLevel> {
        let level = match section {
            Section::Electronics => {
                StockLevel::of(section, stock::set_quantity(&mut self.electronics, id, quantity)?)
            }
            Section::Groceries => {
                StockLevel::of(section, stock::set_quantity(&mut self.groceries, id, quantity)?)
            }
        };
        self.after_change()?;
        Ok(level)
    }

    /// Remove `id` from `section`, returning its last stock level.
    pub fn remove_item(&mut self, section: Section, id: u32) -> DomainResult<StockLevel> {
        let level = match section {
            Section::Electronics => StockLevel::of(section, &self.electronics.remove(id)?),
            Section::Groceries => StockLevel::of(section, &self.groceries.remove(id)?),
        };
        self.after_change()?;
        Ok(level)
    }

    /// Current stock level of `id` in `section`.
    pub fn stock_level(&self, section: Section, id: u32) -> Result<StockLevel, RepoError> {
        Ok(match section {
            Section::Electronics => StockLevel::of(section, self.electronics.get(id)?),
            Section::Groceries => StockLevel::of(section, self.groceries.get(id)?),
        })
    }

    pub fn electronics(&self) -> &Repository<ElectronicItem> {
        &self.electronics
    }

    pub fn groceries(&self) -> &Repository<GroceryItem> {
        &self.groceries
    }

    /// Direct repository access; bypasses the flush policy.
    pub fn electronics_mut(&mut self) -> &mut Repository<ElectronicItem> {
        &mut self.electronics
    }

    /// Direct repository access; bypasses the flush policy.
    pub fn groceries_mut(&mut self) -> &mut Repository<GroceryItem> {
        &mut self.groceries
    }

    pub fn save(&self) -> DomainResult<()> {
        save_repo(&self.store, ELECTRONICS_DOC, &self.electronics)?;
        save_repo(&self.store, GROCERIES_DOC, &self.groceries)
    }

    /// Replace both repositories with their saved snapshots. On error
    /// nothing is replaced.
    pub fn load(&mut self) -> DomainResult<()> {
        let mut electronics = Repository::new();
        let mut groceries = Repository::new();
        load_repo(&self.store, ELECTRONICS_DOC, &mut electronics)?;
        load_repo(&self.store, GROCERIES_DOC, &mut groceries)?;
        tracing::debug!(
            electronics = electronics.len(),
            groceries = groceries.len(),
            "warehouse loaded"
        );

        self.electronics = electronics;
        self.groceries = groceries;
        Ok(())
    }

    fn after_change(&self) -> DomainResult<()> {
        match self.flush {
            FlushPolicy::Manual => Ok(()),
            FlushPolicy::EveryChange => self.save(),
        }
    }
}
