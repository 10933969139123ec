use tally_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_usable_formats() {
    let cfg = Config::default();

    assert!(!cfg.date_format.is_empty());
    assert!(!cfg.time_format.is_empty());
    assert_eq!(cfg.default_settlement, "monthly");
    assert!(cfg.ui_color_enabled);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let loaded = manager.load().expect("load config");
    assert!(loaded.last_opened_counter.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.plain_output = true;
    cfg.last_opened_counter = Some("coffee".to_string());
    cfg.counters_root = Some(dir.path().join("counters"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert!(loaded.plain_output);
    assert_eq!(loaded.last_opened_counter.as_deref(), Some("coffee"));
    assert_eq!(loaded.resolve_counters_root(), dir.path().join("counters"));
}

#[test]
fn backups_round_trip_and_list_newest_first() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("base dir");

    let mut cfg = Config::default();
    cfg.default_settlement = "daily".to_string();
    let name = manager.backup(&cfg, Some("Before Edit!")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.contains("before-edit"));

    let listed = manager.list_backups().expect("list backups");
    assert!(listed.contains(&name));

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.default_settlement, "daily");
}
