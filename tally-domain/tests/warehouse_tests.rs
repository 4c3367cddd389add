//! Warehouse and inventory verbs against an in-memory store.

use chrono::{NaiveDate, TimeZone, Utc};
use rstest::rstest;
use tally_core::{Format, MemoryStorage, SnapshotStore};
use tally_domain::{
    DomainError, ElectronicItem, FlushPolicy, GroceryItem, InventoryManager, Section,
    WarehouseManager,
};

fn warehouse() -> WarehouseManager<MemoryStorage> {
    let mut manager = WarehouseManager::new(SnapshotStore::new(MemoryStorage::new(), Format::Json));
    manager
        .seed_at(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
        .unwrap();
    manager
}

#[test]
fn seed_has_laptop_and_smartphone_stock() {
    let manager = warehouse();
    assert_eq!(manager.electronics().get(1).unwrap().quantity, 10);
    assert_eq!(manager.electronics().get(2).unwrap().quantity, 15);
    assert_eq!(manager.groceries().len(), 2);
}

#[rstest]
#[case::electronics(Section::Electronics, 1, 5, 15)]
#[case::smartphone(Section::Electronics, 2, 1, 16)]
#[case::rice(Section::Groceries, 1, 25, 75)]
fn increase_stock_adds_amount(
    #[case] section: Section,
    #[case] id: u32,
    #[case] amount: i32,
    #[case] expected: i32,
) {
    let mut manager = warehouse();
    let level = manager.increase_stock(section, id, amount).unwrap();
    assert_eq!(level.quantity, expected);
    assert_eq!(manager.stock_level(section, id).unwrap().quantity, expected);
}

#[test]
fn increase_stock_unknown_id_is_not_found_and_changes_nothing() {
    let mut manager = warehouse();
    let before = manager.electronics().all();
    let err = manager.increase_stock(Section::Electronics, 99, 5).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "electronic item with id 99 not found");
    assert_eq!(manager.electronics().all(), before);
}

#[test]
fn negative_quantity_is_rejected_and_value_kept() {
    let mut manager = warehouse();
    let err = manager.update_quantity(Section::Electronics, 1, -5).unwrap_err();
    assert!(err.is_invalid());
    assert_eq!(manager.electronics().get(1).unwrap().quantity, 10);
}

#[test]
fn update_quantity_sets_exact_value() {
    let mut manager = warehouse();
    let level = manager.update_quantity(Section::Groceries, 2, 3).unwrap();
    assert_eq!(level.name, "Milk");
    assert_eq!(level.quantity, 3);
}

#[test]
fn duplicate_add_keeps_original() {
    let mut manager = warehouse();
    let err = manager
        .add_electronic(ElectronicItem::new(1, "Tablet", 4, "Acme", 6))
        .unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(manager.electronics().get(1).unwrap().name, "Laptop");
}

#[test]
fn add_grocery_with_negative_quantity_is_invalid() {
    let mut manager = warehouse();
    let expiry = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let err = manager
        .add_grocery(GroceryItem::new(3, "Eggs", -1, expiry))
        .unwrap_err();
    assert!(err.is_invalid());
    assert!(!manager.groceries().contains(3));
}

#[test]
fn remove_then_remove_again_is_not_found() {
    let mut manager = warehouse();
    let removed = manager.remove_item(Section::Electronics, 2).unwrap();
    assert_eq!(removed.name, "Smartphone");
    assert!(manager
        .remove_item(Section::Electronics, 2)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn every_change_flush_writes_after_each_verb() {
    let storage = MemoryStorage::new();
    let mut manager = WarehouseManager::new(SnapshotStore::new(&storage, Format::Json))
        .with_flush(FlushPolicy::EveryChange);
    manager
        .add_electronic(ElectronicItem::new(7, "Router", 2, "Netgear", 12))
        .unwrap();
    manager.increase_stock(Section::Electronics, 7, 3).unwrap();

    let mut reopened = WarehouseManager::new(SnapshotStore::new(&storage, Format::Json));
    reopened.load().unwrap();
    assert_eq!(reopened.electronics().get(7).unwrap().quantity, 5);
}

#[test]
fn manual_flush_writes_nothing_until_save() {
    let storage = MemoryStorage::new();
    let mut manager = WarehouseManager::new(SnapshotStore::new(&storage, Format::Json));
    manager
        .add_electronic(ElectronicItem::new(7, "Router", 2, "Netgear", 12))
        .unwrap();
    assert!(storage.raw("electronics.json").is_none());

    manager.save().unwrap();
    assert!(storage.raw("electronics.json").is_some());
}

#[test]
fn failed_flush_reports_persist_and_keeps_change() {
    let store = SnapshotStore::new(MemoryStorage::failing(), Format::Json);
    let mut manager = InventoryManager::new(store).with_flush(FlushPolicy::EveryChange);

    let err = manager.add_item(1, "Widget", 5).unwrap_err();
    assert!(matches!(err, DomainError::Persist(_)));
    assert_eq!(manager.items().get(1).unwrap().quantity, 5);
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

fn inventory() -> InventoryManager<MemoryStorage> {
    let mut manager = InventoryManager::new(SnapshotStore::new(MemoryStorage::new(), Format::Json));
    let added = Utc.with_ymd_and_hms(2025, 2, 1, 8, 30, 0).unwrap();
    manager.add_item_at(1, "Bolts", 100, added).unwrap();
    manager.add_item_at(2, "Nuts", 40, added).unwrap();
    manager
}

#[test]
fn inventory_update_keeps_id_and_date() {
    let mut manager = inventory();
    let before = manager.items().get(1).unwrap().date_added;
    let updated = manager.update_item(1, "Hex bolts", 80).unwrap();
    assert_eq!(updated.name, "Hex bolts");
    assert_eq!(updated.quantity, 80);
    assert_eq!(updated.date_added, before);
    assert_eq!(manager.items().get(1).unwrap(), &updated);
}

#[test]
fn inventory_update_missing_is_not_found() {
    let mut manager = inventory();
    let err = manager.update_item(9, "Ghost", 1).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "inventory item with id 9 not found");
    assert!(!manager.items().contains(9));
    assert_eq!(manager.items().len(), 2);
}

#[test]
fn inventory_update_miss_does_not_flush() {
    let storage = MemoryStorage::new();
    let mut manager = InventoryManager::new(SnapshotStore::new(&storage, Format::Json))
        .with_flush(FlushPolicy::EveryChange);
    assert!(manager.update_item(1, "Ghost", 1).is_err());
    assert!(storage.raw("inventory.json").is_none());
}

#[test]
fn warehouse_load_failure_keeps_both_sections() {
    let storage = MemoryStorage::new();
    let mut saved = WarehouseManager::new(SnapshotStore::new(&storage, Format::Json));
    saved
        .add_electronic(ElectronicItem::new(5, "Monitor", 3, "LG", 24))
        .unwrap();
    saved.save().unwrap();
    storage.put_raw("groceries.json", "[{\"id\": 1}]");

    let mut manager = warehouse();
    assert!(matches!(manager.load().unwrap_err(), DomainError::Persist(_)));
    assert_eq!(manager.electronics().get(1).unwrap().name, "Laptop");
    assert!(!manager.electronics().contains(5));
    assert_eq!(manager.groceries().len(), 2);
}

#[test]
fn inventory_delete_returns_item() {
    let mut manager = inventory();
    let removed = manager.delete_item(2).unwrap();
    assert_eq!(removed.name, "Nuts");
    assert!(manager.delete_item(2).unwrap_err().is_not_found());
}

#[test]
fn inventory_rejects_duplicate_id() {
    let mut manager = inventory();
    assert!(manager.add_item(1, "Washers", 10).unwrap_err().is_duplicate());
    assert_eq!(manager.items().get(1).unwrap().name, "Bolts");
}
