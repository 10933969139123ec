//! Filesystem-backed JSON persistence for counters and their backups.
//!
//! One pretty-printed JSON file per counter under the counters directory.
//! Writes go through a temp file and rename; saving over an existing file
//! first copies it into the backups directory, which is pruned to a retention
//! limit.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use tally_core::{
    storage::{CounterBackupInfo, CounterStorage},
    CoreError,
};
use tally_domain::Counter;

const COUNTER_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for counters and their backups.
#[derive(Clone)]
pub struct JsonCounterStorage {
    counters_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonCounterStorage {
    pub fn new(counters_dir: PathBuf, backups_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(counters_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        counters_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self, CoreError> {
        fs::create_dir_all(&counters_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            counters_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn counter_path(&self, name: &str) -> PathBuf {
        self.counters_dir
            .join(format!("{}.{}", canonical_name(name), COUNTER_EXTENSION))
    }

    /// Loads every stored counter and summarizes it for listing screens.
    pub fn list_counter_metadata(&self) -> Result<Vec<CounterMetadata>, CoreError> {
        let mut entries = Vec::new();
        for slug in self.list_counters()? {
            let counter = self.load_counter(&slug)?;
            let path = self.counter_path(&slug);
            entries.push(CounterMetadata {
                slug: slug.clone(),
                name: counter.name.clone(),
                path,
                created_at: counter.created_at,
                updated_at: counter.updated_at,
                cadence: counter.settlement.label(),
                icon: counter.icon.tag().to_string(),
                occurrence_count: counter.log.total(),
                first_occurrence: counter.log.earliest(),
                has_frequency_limit: counter.frequency.is_some(),
                has_reminders: counter
                    .reminders
                    .as_ref()
                    .map(|config| !config.is_empty())
                    .unwrap_or(false),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn write_backup_file(
        &self,
        counter: &Counter,
        name: &str,
        note: Option<&str>,
    ) -> Result<CounterBackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, COUNTER_EXTENSION);
        let path = dir.join(&file_name);
        write_atomic(&path, &serialize_counter(counter)?)?;
        self.prune_backups(name)?;
        Ok(CounterBackupInfo {
            counter: canonical_name(name),
            id: file_name.clone(),
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{}_{}.{}", canonical_name(name), timestamp, COUNTER_EXTENSION);
        let backup_path = dir.join(&file_name);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let mut entries = self.list_backups(name)?;
        entries.sort_by_key(|info| Reverse(parse_backup_timestamp(&info.id)));
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl CounterStorage for JsonCounterStorage {
    fn save_counter(&self, name: &str, counter: &Counter) -> Result<(), CoreError> {
        let path = self.counter_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_counter(counter)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_counter(&self, name: &str) -> Result<Counter, CoreError> {
        let path = self.counter_path(name);
        if !path.exists() {
            return Err(CoreError::CounterNotFound(name.to_string()));
        }
        load_counter_from_path(&path)
    }

    fn list_counters(&self) -> Result<Vec<String>, CoreError> {
        if !self.counters_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.counters_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(COUNTER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_counter(&self, name: &str) -> Result<(), CoreError> {
        let path = self.counter_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_counter_to_path(&self, counter: &Counter, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.counters_dir) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_counter_to_path(counter, path)
    }

    fn load_counter_from_path(&self, path: &Path) -> Result<Counter, CoreError> {
        load_counter_from_path(path)
    }

    fn backup_counter(
        &self,
        name: &str,
        counter: &Counter,
        note: Option<&str>,
    ) -> Result<CounterBackupInfo, CoreError> {
        self.write_backup_file(counter, name, note)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<CounterBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        let counter_slug = canonical_name(name);
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(COUNTER_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(CounterBackupInfo {
                    counter: counter_slug.clone(),
                    id: file_name.to_string(),
                    created_at: file_name.to_string(),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse(parse_backup_timestamp(&info.id)));
        Ok(entries)
    }

    fn restore_backup(&self, backup: &CounterBackupInfo) -> Result<Counter, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let target = self.counter_path(&backup.counter);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        load_counter_from_path(&target)
    }
}

/// Saves a counter to an arbitrary path on disk.
pub fn save_counter_to_path(counter: &Counter, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_counter(counter)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a counter from the provided filesystem path.
pub fn load_counter_from_path(path: &Path) -> Result<Counter, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Listing-screen summary of one stored counter.
#[derive(Debug, Clone)]
pub struct CounterMetadata {
    pub slug: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cadence: String,
    pub icon: String,
    pub occurrence_count: usize,
    pub first_occurrence: Option<NaiveDateTime>,
    pub has_frequency_limit: bool,
    pub has_reminders: bool,
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "counter".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", COUNTER_EXTENSION))?;
    let mut segments = trimmed.split('_').collect::<Vec<_>>();
    if segments.len() < 2 {
        return None;
    }
    let time = segments.pop().unwrap();
    let date = segments.pop().unwrap();
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_counter(counter: &Counter) -> Result<String, CoreError> {
    serde_json::to_string_pretty(counter).map_err(|err| CoreError::Serde(err.to_string()))
}
