use tally_core::storage::CounterStorage;
use tally_core::CoreError;
use tally_domain::{Counter, CounterIcon, FrequencyLimit, SettlementPeriod, WindowUnit};
use tally_storage_json::JsonCounterStorage;
use tempfile::tempdir;

fn storage(dir: &std::path::Path) -> JsonCounterStorage {
    JsonCounterStorage::new(dir.join("counters"), dir.join("backups")).expect("create storage")
}

fn sample_counter() -> Counter {
    let mut counter = Counter::new(
        "Coffee Breaks",
        CounterIcon::Cup,
        SettlementPeriod::monthly(1, 25, 24, 1),
    )
    .with_frequency(FrequencyLimit::new(WindowUnit::Day, 1, 3));
    counter
        .record_occurrence(
            chrono::NaiveDate::from_ymd_opt(2025, 11, 10)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        )
        .unwrap();
    counter
}

#[test]
fn save_and_load_round_trips_the_counter() {
    let dir = tempdir().expect("tempdir");
    let storage = storage(dir.path());
    let counter = sample_counter();

    storage.save_counter("coffee breaks", &counter).expect("save");
    let loaded = storage.load_counter("coffee breaks").expect("load");

    assert_eq!(loaded.id, counter.id);
    assert_eq!(loaded.name, "Coffee Breaks");
    assert_eq!(loaded.settlement, counter.settlement);
    assert_eq!(loaded.frequency, counter.frequency);
    assert_eq!(loaded.log.total(), 1);

    let path = storage.counter_path("coffee breaks");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("coffee_breaks.json"));
    assert!(path.exists());
}

#[test]
fn stored_json_uses_the_contract_field_names() {
    let dir = tempdir().expect("tempdir");
    let storage = storage(dir.path());
    storage.save_counter("coffee", &sample_counter()).expect("save");

    let raw = std::fs::read_to_string(storage.counter_path("coffee")).expect("read file");
    assert!(raw.contains("\"startDay\""));
    assert!(raw.contains("\"endMonthOffset\""));
    assert!(raw.contains("\"windowUnit\""));
    assert!(raw.contains("\"maxCount\""));
}

#[test]
fn missing_counter_reports_not_found() {
    let dir = tempdir().expect("tempdir");
    let storage = storage(dir.path());

    let err = storage.load_counter("nope").unwrap_err();
    assert!(matches!(err, CoreError::CounterNotFound(_)));
}

#[test]
fn listing_returns_sorted_slugs() {
    let dir = tempdir().expect("tempdir");
    let storage = storage(dir.path());
    storage.save_counter("Walks", &sample_counter()).expect("save");
    storage.save_counter("Coffee", &sample_counter()).expect("save");

    assert_eq!(storage.list_counters().expect("list"), vec!["coffee", "walks"]);

    let metadata = storage.list_counter_metadata().expect("metadata");
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].occurrence_count, 1);
    assert!(metadata[0].has_frequency_limit);
    assert!(!metadata[0].has_reminders);
}

#[test]
fn backups_create_restore_and_prune() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonCounterStorage::with_retention(dir.path().join("counters"), dir.path().join("backups"), 2)
            .expect("create storage");
    let counter = sample_counter();
    storage.save_counter("coffee", &counter).expect("save");

    let info = storage
        .backup_counter("coffee", &counter, Some("Before Edit"))
        .expect("backup");
    assert!(info.id.contains("before-edit"));

    let backups = storage.list_backups("coffee").expect("list backups");
    assert!(backups.iter().any(|entry| entry.id == info.id));

    let restored = storage.restore_backup(&info).expect("restore");
    assert_eq!(restored.id, counter.id);

    // Retention keeps the newest two files only.
    for _ in 0..4 {
        storage.backup_counter("coffee", &counter, None).expect("backup");
    }
    assert!(storage.list_backups("coffee").expect("list").len() <= 2);
}

#[test]
fn delete_removes_the_counter_file() {
    let dir = tempdir().expect("tempdir");
    let storage = storage(dir.path());
    storage.save_counter("coffee", &sample_counter()).expect("save");

    storage.delete_counter("coffee").expect("delete");
    assert!(storage.list_counters().expect("list").is_empty());
    assert!(!storage.counter_path("coffee").exists());
}
