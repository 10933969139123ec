use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stores user-configurable CLI preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    #[serde(default = "Config::default_time_format")]
    pub time_format: String,
    #[serde(default = "Config::default_settlement_value")]
    pub default_settlement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_counter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for counters. Defaults to `~/Documents/Counters`.
    pub counters_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `~/Documents/CounterBackups`.
    pub backups_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
            date_format: Self::default_date_format(),
            time_format: Self::default_time_format(),
            default_settlement: Self::default_settlement_value(),
            last_opened_counter: None,
            counters_root: None,
            backups_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_date_format() -> String {
        "%Y-%m-%d".into()
    }

    pub fn default_time_format() -> String {
        "%H:%M:%S".into()
    }

    pub fn default_settlement_value() -> String {
        "monthly".into()
    }

    pub fn resolve_counters_root(&self) -> PathBuf {
        if let Some(path) = &self.counters_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Counters")
    }

    pub fn resolve_backups_root(&self) -> PathBuf {
        if let Some(path) = &self.backups_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("CounterBackups")
    }
}
