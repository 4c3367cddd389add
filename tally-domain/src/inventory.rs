//! Inventory log: a single repository driven through the lenient
//! update/remove operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Entity, RepoError, Repository, SnapshotStore, Storage};

use crate::error::DomainResult;
use crate::manager::{load_repo, save_repo, FlushPolicy};
use crate::stock::{check_quantity, Stocked};

pub const INVENTORY_DOC: &str = "inventory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u32,
    pub name: String,
    pub quantity: i32,
    pub date_added: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(id: u32, name: impl Into<String>, quantity: i32, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            date_added,
        }
    }

    /// Copy with a new name and quantity; `id` and `date_added` are kept.
    pub fn revised(&self, name: impl Into<String>, quantity: i32) -> Self {
        Self {
            name: name.into(),
            quantity,
            ..self.clone()
        }
    }
}

impl Entity for InventoryItem {
    type Id = u32;
    const KIND: &'static str = "inventory item";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Stocked for InventoryItem {
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

#[derive(Debug)]
pub struct InventoryManager<S> {
    items: Repository<InventoryItem>,
    store: SnapshotStore<S>,
    flush: FlushPolicy,
}

impl<S: Storage> InventoryManager<S> {
    pub fn new(store: SnapshotStore<S>) -> Self {
        Self {
            items: Repository::new(),
            store,
            flush: FlushPolicy::default(),
        }
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    /// Record a new item stamped with `added_at`.
    pub fn add_item_at(
        &mut self,
        id: u32,
        name: impl Into<String>,
        quantity: i32,
        added_at: DateTime<Utc>,
    ) -> DomainResult<InventoryItem> {
        check_quantity::<InventoryItem>(quantity)?;
        let item = InventoryItem::new(id, name, quantity, added_at);
        self.items.add(item.clone())?;
        self.after_change()?;
        Ok(item)
    }

    pub fn add_item(
        &mut self,
        id: u32,
        name: impl Into<String>,
        quantity: i32,
    ) -> DomainResult<InventoryItem> {
        self.add_item_at(id, name, quantity, Utc::now())
    }

    /// Rename and restock `id`. A missing item is reported as `NotFound`.
    pub fn update_item(
        &mut self,
        id: u32,
        name: impl Into<String>,
        quantity: i32,
    ) -> DomainResult<InventoryItem> {
        check_quantity::<InventoryItem>(quantity)?;
        // A miss is reported by `try_update`; the placeholder is never stored.
        let updated = match self.items.get(id).ok() {
            Some(current) => current.revised(name, quantity),
            None => InventoryItem::new(id, name, quantity, Utc::now()),
        };
        if !self.items.try_update(id, updated.clone()) {
            return Err(RepoError::not_found(InventoryItem::KIND, id).into());
        }
        self.after_change()?;
        Ok(updated)
    }

    /// Delete `id`, returning the removed item.
    pub fn delete_item(&mut self, id: u32) -> DomainResult<InventoryItem> {
        let removed = self
            .items
            .try_remove(id)
            .ok_or_else(|| RepoError::not_found(InventoryItem::KIND, id))?;
        self.after_change()?;
        Ok(removed)
    }

    pub fn items(&self) -> &Repository<InventoryItem> {
        &self.items
    }

    pub fn save(&self) -> DomainResult<()> {
        save_repo(&self.store, INVENTORY_DOC, &self.items)
    }

    pub fn load(&mut self) -> DomainResult<usize> {
        load_repo(&self.store, INVENTORY_DOC, &mut self.items)
    }

    fn after_change(&self) -> DomainResult<()> {
        match self.flush {
            FlushPolicy::Manual => Ok(()),
            FlushPolicy::EveryChange => self.save(),
        }
    }
}
