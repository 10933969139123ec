//! Shell state, error types, and command dispatch.

use std::{env, path::PathBuf};

use strsim::levenshtein;
use thiserror::Error;

use tally_config::{Config, ConfigError, ConfigManager};
use tally_core::CoreError;
use tally_storage_json::JsonCounterStorage;

use crate::cli::{
    commands, help, output, scheduler::LoggingReminderScheduler, system_clock::SystemClock,
};

pub const COMMAND_NAMES: &[&str] = &[
    "help", "list", "create", "show", "tick", "history", "entries", "rename", "icon", "period",
    "limit", "remind", "delete", "config", "exit", "quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

/// Mutable shell state shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub storage: JsonCounterStorage,
    pub clock: SystemClock,
    pub scheduler: LoggingReminderScheduler,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home_override = env::var_os("TALLY_HOME").map(PathBuf::from);
        let base = home_override
            .clone()
            .unwrap_or_else(ConfigManager::default_base);
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;

        output::set_preferences(output::OutputPreferences {
            plain_output: config.plain_output,
            color_enabled: config.ui_color_enabled,
        });

        // An explicit TALLY_HOME keeps all state under one directory, which
        // also keeps script runs hermetic.
        let (counters_root, backups_root) = if home_override.is_some() {
            (base.join("counters"), base.join("backups"))
        } else {
            (config.resolve_counters_root(), config.resolve_backups_root())
        };
        let storage = JsonCounterStorage::new(counters_root, backups_root)?;

        Ok(Self {
            mode,
            running: true,
            config,
            config_manager,
            storage,
            clock: SystemClock,
            scheduler: LoggingReminderScheduler,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMAND_NAMES.to_vec()
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "help" => {
                help::print_help(args);
                Ok(LoopControl::Continue)
            }
            "list" | "ls" => commands::list(self),
            "create" | "new" => commands::create(self, args),
            "show" => commands::show(self, args),
            "tick" | "record" => commands::tick(self, args),
            "history" => commands::history(self, args),
            "entries" => commands::entries(self, args),
            "rename" => commands::rename(self, args),
            "icon" => commands::set_icon(self, args),
            "period" => commands::edit_period(self, args),
            "limit" => commands::edit_limit(self, args),
            "remind" => commands::remind(self, args),
            "delete" | "rm" => commands::delete(self, args),
            "config" => commands::show_config(self),
            "exit" | "quit" => Ok(LoopControl::Exit),
            _ => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = COMMAND_NAMES
            .iter()
            .map(|name| (levenshtein(name, input), *name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Counter name to operate on when a command omits one.
    pub fn default_counter_name(&self) -> Option<String> {
        self.config.last_opened_counter.clone()
    }

    pub fn remember_last_opened(&mut self, name: &str) -> Result<(), CommandError> {
        if self.config.last_opened_counter.as_deref() == Some(name) {
            return Ok(());
        }
        self.config.last_opened_counter = Some(name.to_string());
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn forget_last_opened(&mut self, name: &str) -> Result<(), CommandError> {
        if self.config.last_opened_counter.as_deref() == Some(name) {
            self.config.last_opened_counter = None;
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}
