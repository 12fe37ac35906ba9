use std::fs;

use branch_inventory::storage::{self, EXPORT_FILE_NAME};
use branch_inventory::{InventoryError, InventoryFilter, InventoryRecord, InventoryStore};
use tempfile::TempDir;

fn sample_records() -> Vec<InventoryRecord> {
    vec![
        InventoryRecord::new("Dongdaemun", "Rice", "Grains/Noodles", "kg", 5.0, 10.0, ""),
        InventoryRecord::new("Yangjae", "김치", "Other", "통", 2.5, 1.0, "냉장 보관"),
        InventoryRecord::new(
            "Lumbini",
            "Ghee, clarified",
            "Sauces",
            "jar",
            0.1 + 0.2,
            3.0,
            "says \"keep cool\"\nsecond line",
        ),
    ]
}

#[test]
fn save_then_load_reproduces_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("inventory.csv");
    let records = sample_records();

    storage::save(&path, &records).unwrap();
    let loaded = storage::load(&path).unwrap();

    assert_eq!(loaded, records);
}

#[test]
fn saved_file_has_bom_and_fixed_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.csv");
    storage::save(&path, &sample_records()[..1]).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("branch,itemName,category,unit,currentQty,minQty,note")
    );
}

#[test]
fn save_replaces_the_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.csv");
    storage::save(&path, &sample_records()).unwrap();

    let mut fewer = sample_records();
    fewer.truncate(1);
    storage::save(&path, &fewer).unwrap();

    assert_eq!(storage::load(&path).unwrap(), fewer);
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let loaded = storage::load(&dir.path().join("absent.csv")).unwrap();
    assert!(loaded.is_empty());

    let report = storage::load_or_empty(&dir.path().join("absent.csv"));
    assert!(report.records.is_empty());
    assert!(report.warning.is_none());
}

#[test]
fn missing_columns_are_back_filled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.csv");
    fs::write(&path, "branch,itemName,currentQty\nYangjae,Onion,abc\nYangjae,Garlic,4\n").unwrap();

    let loaded = storage::load(&path).unwrap();

    assert_eq!(
        loaded,
        vec![
            InventoryRecord::new("Yangjae", "Onion", "", "", 0.0, 0.0, ""),
            InventoryRecord::new("Yangjae", "Garlic", "", "", 4.0, 0.0, ""),
        ]
    );
}

#[test]
fn corrupt_file_is_a_read_error_and_falls_back_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, b"branch,itemName\n\xff\xfe,Rice\n").unwrap();

    let err = storage::load(&path).unwrap_err();
    assert!(matches!(err, InventoryError::PersistenceRead { .. }));

    let report = storage::load_or_empty(&path);
    assert!(report.records.is_empty());
    assert!(matches!(
        report.warning,
        Some(InventoryError::PersistenceRead { .. })
    ));
}

#[test]
fn unreadable_path_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = storage::load(dir.path()).unwrap_err();
    assert!(matches!(err, InventoryError::PersistenceRead { .. }));
}

#[test]
fn failed_save_leaves_target_untouched() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("occupied");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), "still here").unwrap();

    let err = storage::save(&target, &sample_records()).unwrap_err();

    assert!(matches!(err, InventoryError::PersistenceWrite { .. }));
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "still here");
    assert!(!dir.path().join("occupied.tmp").exists());
}

#[test]
fn export_writes_only_the_filtered_view() {
    let dir = TempDir::new().unwrap();
    let store = InventoryStore::from_records(sample_records());
    let filter = InventoryFilter::all().below_threshold_only(true);
    let path = dir.path().join(EXPORT_FILE_NAME);

    let count = storage::export_to_path(&path, store.query(&filter)).unwrap();

    assert_eq!(count, 2);
    let exported = storage::load(&path).unwrap();
    let names: Vec<_> = exported.iter().map(|r| r.item_name.as_str()).collect();
    assert_eq!(names, ["Rice", "Ghee, clarified"]);
}

#[test]
fn header_without_item_name_column_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("korean.csv");
    let original = "\u{feff}지점,품목명,카테고리,단위,현재수량,최소수량,비고\n\
                    동대문,양파,채소,kg,3,5,\n\
                    양재,마늘,채소,kg,1,2,\n";
    fs::write(&path, original).unwrap();

    let err = storage::load(&path).unwrap_err();
    assert!(matches!(err, InventoryError::PersistenceRead { .. }));

    let report = storage::load_or_empty(&path);
    assert!(report.records.is_empty());
    assert!(report.warning.is_some());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn rows_without_item_name_are_skipped_and_counted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gaps.csv");
    fs::write(
        &path,
        "branch,itemName,category,unit,currentQty,minQty,note\n\
         Yangjae,,Other,kg,1,1,\n\
         Yangjae,Onion,Vegetables,kg,3,5,\n\
         Dongtan,   ,Other,kg,2,2,\n",
    )
    .unwrap();

    let report = storage::load_or_empty(&path);

    assert!(report.warning.is_none());
    assert_eq!(report.skipped, 2);
    let names: Vec<_> = report.records.iter().map(|r| r.item_name.as_str()).collect();
    assert_eq!(names, ["Onion"]);

    let mut store = InventoryStore::from_records(report.records);
    store
        .upsert(InventoryRecord::new("Dongtan", "Rice", "Grains/Noodles", "kg", 5.0, 1.0, ""))
        .unwrap();
    storage::save(&path, store.records()).unwrap();
    let names: Vec<_> = storage::load(&path)
        .unwrap()
        .into_iter()
        .map(|r| r.item_name)
        .collect();
    assert_eq!(names, ["Onion", "Rice"]);
}

#[test]
fn empty_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let report = storage::load_or_empty(&path);
    assert!(report.records.is_empty());
    assert!(report.warning.is_none());
}
