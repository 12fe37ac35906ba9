//! End-to-end flows over the store and the CSV layer together, the way the
//! UI drives them.

use branch_inventory::storage;
use branch_inventory::{
    InventoryError, InventoryFilter, InventoryRecord, InventoryStore, RecordField, UpsertOutcome,
};
use tempfile::TempDir;

#[test]
fn mutations_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.csv");

    let mut store = InventoryStore::from_records(storage::load(&path).unwrap());
    assert!(store.is_empty());

    store
        .upsert(InventoryRecord::new("A", "Rice", "Grain", "kg", 5.0, 10.0, ""))
        .unwrap();
    store
        .upsert(InventoryRecord::new("A", "Beef", "Meat", "kg", 30.0, 10.0, ""))
        .unwrap();
    assert_eq!(
        store
            .upsert(InventoryRecord::new("A", "Rice", "Grain", "kg", 20.0, 10.0, "refilled"))
            .unwrap(),
        UpsertOutcome::Updated
    );
    store.delete("A", "Beef").unwrap();
    storage::save(&path, store.records()).unwrap();
    store.mark_clean();

    let reopened = InventoryStore::from_records(storage::load(&path).unwrap());
    assert_eq!(reopened.records(), store.records());
    assert_eq!(reopened.get("A", "Rice").unwrap().note, "refilled");
    assert!(reopened
        .query(&InventoryFilter::all().below_threshold_only(true))
        .next()
        .is_none());
}

#[test]
fn rejected_operations_leave_the_file_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.csv");
    let mut store = InventoryStore::new();
    store
        .upsert(InventoryRecord::new("A", "Rice", "Grain", "kg", 5.0, 10.0, ""))
        .unwrap();
    storage::save(&path, store.records()).unwrap();
    store.mark_clean();

    assert!(matches!(
        store.delete("B", "Rice"),
        Err(InventoryError::NotFound { .. })
    ));
    assert!(matches!(
        store.upsert(InventoryRecord::new("A", "  ", "Grain", "kg", 1.0, 1.0, "")),
        Err(InventoryError::Validation(_))
    ));
    assert!(!store.is_dirty());
    assert_eq!(storage::load(&path).unwrap(), store.records());
}

#[test]
fn cascading_options_follow_the_loaded_file() {
    let store = InventoryStore::from_records(vec![
        InventoryRecord::new("Yangjae", "Onion", "Vegetables", "kg", 1.0, 2.0, ""),
        InventoryRecord::new("Yangjae", "Cola", "Beverages", "can", 48.0, 24.0, ""),
        InventoryRecord::new("Dongtan", "Shrimp", "Seafood", "box", 3.0, 1.0, ""),
    ]);

    let yangjae = InventoryFilter::all().with_branches(["Yangjae"]);
    assert_eq!(
        store.options(RecordField::Category, &yangjae),
        ["Beverages", "Vegetables"]
    );
    let vegetables = yangjae.with_categories(["Vegetables"]);
    assert_eq!(store.options(RecordField::ItemName, &vegetables), ["Onion"]);
}
