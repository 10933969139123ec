//! Command handlers for the counter shell.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use tally_core::{
    storage::CounterStorage, Clock, CoreError, CounterService, ReminderService, ReportService,
};
use tally_domain::{
    Counter, CounterIcon, FrequencyLimit, LocationReminder, Period, ReminderConfig,
    ReminderFrequency, SettlementPeriod, TimeReminder, WindowUnit,
};

use crate::cli::{
    core::{CliMode, CommandError, LoopControl, ShellContext},
    output,
};

pub fn list(ctx: &mut ShellContext) -> Result<LoopControl, CommandError> {
    let entries = ctx.storage.list_counter_metadata()?;
    if entries.is_empty() {
        output::info("No counters yet. Use `create` to add one.");
        return Ok(LoopControl::Continue);
    }

    output::section("Counters");
    for entry in entries {
        let mut traits = vec![entry.cadence.clone()];
        if entry.has_frequency_limit {
            traits.push("limited".into());
        }
        if entry.has_reminders {
            traits.push("reminders".into());
        }
        output::info(format!(
            "{:<20} [{}] {} — {} recorded",
            entry.slug,
            entry.icon,
            traits.join(", "),
            entry.occurrence_count
        ));
    }
    Ok(LoopControl::Continue)
}

pub fn create(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let counter = if args.is_empty() {
        if ctx.mode == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "usage: create <name> [daily|weekly|monthly|yearly]".into(),
            ));
        }
        create_interactive(ctx)?
    } else {
        let name = args[0];
        let cadence = args
            .get(1)
            .copied()
            .unwrap_or(ctx.config.default_settlement.as_str());
        let settlement = settlement_for_cadence(cadence)?;
        CounterService::create(name, CounterIcon::default(), settlement, None)?
    };

    ctx.storage.save_counter(&counter.name, &counter)?;
    let name = counter.name.clone();
    ctx.remember_last_opened(&name)?;
    output::success(format!(
        "Created counter `{}` ({})",
        counter.name,
        counter.settlement.label()
    ));
    Ok(LoopControl::Continue)
}

pub fn show(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let name = resolve_name(ctx, args)?;
    let counter = load(ctx, &name)?;
    let report = ReportService::current(&counter, ctx.clock.now());

    output::section(&counter.name);
    output::info(format!("Icon: {}   Cadence: {}", counter.icon, counter.settlement.label()));
    output::info(format!(
        "Current period: {}",
        format_period(ctx, &report.period)
    ));
    output::info(format!("Count this period: {}", report.count));
    match (&counter.frequency, report.remaining) {
        (Some(limit), Some(remaining)) => {
            output::info(format!("Limit: {} ({} left)", limit.label(), remaining));
        }
        _ => output::info("Limit: none"),
    }
    output::info(format!("Lifetime total: {}", report.total));
    ctx.remember_last_opened(&name)?;
    Ok(LoopControl::Continue)
}

pub fn tick(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let name = resolve_name(ctx, args)?;
    let mut counter = load(ctx, &name)?;

    match CounterService::record(&mut counter, &ctx.clock) {
        Ok(instant) => {
            ctx.storage.save_counter(&name, &counter)?;
            let count = counter.current_count(instant);
            output::success(format!(
                "Recorded `{}` at {} ({} this period)",
                counter.name,
                format_instant(ctx, instant),
                count
            ));
            if let Some(remaining) = counter.remaining_allowance(instant) {
                output::info(format!("Remaining in window: {}", remaining));
            }
        }
        Err(CoreError::LimitExceeded) => {
            let label = counter
                .frequency
                .as_ref()
                .map(|limit| limit.label())
                .unwrap_or_default();
            output::warning(format!("Limit reached: {}.", label));
        }
        Err(other) => return Err(other.into()),
    }
    ctx.remember_last_opened(&name)?;
    Ok(LoopControl::Continue)
}

pub fn history(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let name = resolve_name(ctx, args)?;
    let counter = load(ctx, &name)?;
    let summaries = ReportService::history(&counter, ctx.clock.now());

    output::section(format!("History — {}", counter.name));
    for (index, summary) in summaries.iter().enumerate() {
        output::info(format!(
            "{:>3}. {}  count: {}",
            index + 1,
            format_period(ctx, &summary.period),
            summary.count
        ));
    }
    Ok(LoopControl::Continue)
}

pub fn entries(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [name, index] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: entries <name> <period-index>".into(),
        ));
    };
    let counter = load(ctx, name)?;
    let summaries = ReportService::history(&counter, ctx.clock.now());
    let index: usize = index
        .parse()
        .map_err(|_| CommandError::InvalidArguments("period index must be a number".into()))?;
    let Some(summary) = index.checked_sub(1).and_then(|index| summaries.get(index)) else {
        return Err(CommandError::Failed(format!(
            "No period #{index}; `history {name}` lists {} periods.",
            summaries.len()
        )));
    };

    output::section(format_period(ctx, &summary.period));
    let instants = ReportService::entries(&counter, &summary.period);
    if instants.is_empty() {
        output::info("No occurrences in this period.");
    }
    for instant in instants {
        output::info(format_instant(ctx, instant));
    }
    Ok(LoopControl::Continue)
}

pub fn rename(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: rename <name> <new name...>".into()))?;
    if rest.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: rename <name> <new name...>".into(),
        ));
    }
    let mut counter = load(ctx, name)?;
    CounterService::rename(&mut counter, rest.join(" "))?;
    ctx.storage.save_counter(name, &counter)?;
    output::success(format!("Renamed to `{}`.", counter.name));
    Ok(LoopControl::Continue)
}

pub fn set_icon(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [name, tag] = args else {
        return Err(CommandError::InvalidArguments("usage: icon <name> <tag>".into()));
    };
    let icon = parse_icon(tag)?;
    let mut counter = load(ctx, name)?;
    CounterService::set_icon(&mut counter, icon);
    ctx.storage.save_counter(name, &counter)?;
    output::success(format!("Icon set to `{}`.", icon));
    Ok(LoopControl::Continue)
}

pub fn edit_period(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let usage = "usage: period <name> day <span> | period <name> month|year <span> <start-day> <end-day> [offset]";
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(usage.into()))?;

    let settlement = match rest {
        ["day", span] => SettlementPeriod::daily(parse_number(span, "span")?),
        ["month", span, start, end] => SettlementPeriod::monthly(
            parse_number(span, "span")?,
            parse_number(start, "start day")?,
            parse_number(end, "end day")?,
            0,
        ),
        ["month", span, start, end, offset] => SettlementPeriod::monthly(
            parse_number(span, "span")?,
            parse_number(start, "start day")?,
            parse_number(end, "end day")?,
            parse_number(offset, "offset")?,
        ),
        ["year", span, start, end] => SettlementPeriod::yearly(
            parse_number(span, "span")?,
            parse_number(start, "start day")?,
            parse_number(end, "end day")?,
        ),
        _ => return Err(CommandError::InvalidArguments(usage.into())),
    };

    let mut counter = load(ctx, name)?;
    CounterService::set_settlement(&mut counter, settlement)?;
    ctx.storage.save_counter(name, &counter)?;
    output::success(format!("Settlement period set to {}.", counter.settlement.label()));
    output::warning("History is re-derived under the new settlement parameters.");
    Ok(LoopControl::Continue)
}

pub fn edit_limit(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let usage = "usage: limit <name> <hour|day|month|year> <span> <max> | limit <name> off";
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(usage.into()))?;
    let mut counter = load(ctx, name)?;

    match rest {
        ["off"] => {
            if CounterService::clear_frequency(&mut counter) {
                output::success("Frequency limit removed.");
            } else {
                output::info("No frequency limit was configured.");
            }
        }
        [unit, span, max] => {
            let limit = FrequencyLimit::new(
                parse_window_unit(unit)?,
                parse_number(span, "window span")?,
                parse_number(max, "max count")?,
            );
            let label = limit.label();
            CounterService::set_frequency(&mut counter, limit)?;
            output::success(format!("Frequency limit set: {}.", label));
        }
        _ => return Err(CommandError::InvalidArguments(usage.into())),
    }

    ctx.storage.save_counter(name, &counter)?;
    Ok(LoopControl::Continue)
}

pub fn remind(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let usage = "usage: remind <name> list | time <HH:MM> [daily|weekly|monthly] | location <lat> <lng> <radius> [label] | clear";
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(usage.into()))?;
    let mut counter = load(ctx, name)?;

    match rest {
        ["list"] | [] => {
            print_reminders(&counter);
            return Ok(LoopControl::Continue);
        }
        ["time", time, freq @ ..] => {
            let (hour, minute) = parse_clock_time(time)?;
            let frequency = match freq {
                [] | ["daily"] => ReminderFrequency::Daily,
                ["weekly"] => ReminderFrequency::Weekly,
                ["monthly"] => ReminderFrequency::Monthly,
                _ => return Err(CommandError::InvalidArguments(usage.into())),
            };
            let config = counter.reminders.get_or_insert_with(ReminderConfig::default);
            config.time_reminders.push(TimeReminder::new(hour, minute, frequency));
            ReminderService::sync(&mut counter, &ctx.scheduler)?;
            output::success("Time reminder added.");
        }
        ["location", lat, lng, radius, label @ ..] => {
            let name_label = if label.is_empty() {
                None
            } else {
                Some(label.join(" "))
            };
            let reminder = LocationReminder::new(
                name_label,
                parse_float(lat, "latitude")?,
                parse_float(lng, "longitude")?,
                parse_float(radius, "radius")?,
            );
            let config = counter.reminders.get_or_insert_with(ReminderConfig::default);
            config.location_reminders.push(reminder);
            ReminderService::sync(&mut counter, &ctx.scheduler)?;
            output::success("Location reminder added.");
        }
        ["clear"] => {
            ReminderService::cancel_all(&mut counter, &ctx.scheduler)?;
            counter.reminders = None;
            output::success("Reminders cleared.");
        }
        _ => return Err(CommandError::InvalidArguments(usage.into())),
    }

    ctx.storage.save_counter(name, &counter)?;
    Ok(LoopControl::Continue)
}

pub fn delete(ctx: &mut ShellContext, args: &[&str]) -> Result<LoopControl, CommandError> {
    let [name] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <name>".into()));
    };
    let mut counter = load(ctx, name)?;

    if ctx.mode == CliMode::Interactive {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete `{}` and its {} recorded occurrences?",
                counter.name,
                counter.log.total()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Delete cancelled.");
            return Ok(LoopControl::Continue);
        }
    }

    ReminderService::cancel_all(&mut counter, &ctx.scheduler)?;
    ctx.storage.delete_counter(name)?;
    ctx.forget_last_opened(name)?;
    output::success(format!("Deleted `{}`.", counter.name));
    Ok(LoopControl::Continue)
}

pub fn show_config(ctx: &mut ShellContext) -> Result<LoopControl, CommandError> {
    output::section("Configuration");
    output::info(format!("Path: {}", ctx.config_manager.config_path().display()));
    let json = serde_json::to_string_pretty(&ctx.config)
        .map_err(|err| CommandError::Failed(err.to_string()))?;
    output::info(json);
    Ok(LoopControl::Continue)
}

fn create_interactive(ctx: &ShellContext) -> Result<Counter, CommandError> {
    let theme = ColorfulTheme::default();
    let name: String = Input::with_theme(&theme)
        .with_prompt("Counter name")
        .interact_text()?;

    let icon_tags: Vec<&str> = CounterIcon::ALL.iter().map(|icon| icon.tag()).collect();
    let icon_index = Select::with_theme(&theme)
        .with_prompt("Icon")
        .items(&icon_tags)
        .default(0)
        .interact()?;
    let icon = CounterIcon::ALL[icon_index];

    let units = ["day", "month", "year"];
    let unit_index = Select::with_theme(&theme)
        .with_prompt("Settlement unit")
        .items(&units)
        .default(1)
        .interact()?;
    let span: u32 = Input::with_theme(&theme)
        .with_prompt("Units per period")
        .default(1)
        .interact_text()?;

    let settlement = match units[unit_index] {
        "day" => SettlementPeriod::daily(span),
        unit => {
            let start_day: u32 = Input::with_theme(&theme)
                .with_prompt("Start day (1-31)")
                .default(1)
                .interact_text()?;
            let end_day: u32 = Input::with_theme(&theme)
                .with_prompt("End day (1-31)")
                .default(31)
                .interact_text()?;
            if unit == "month" {
                let offset: u32 = Input::with_theme(&theme)
                    .with_prompt("End month offset")
                    .default(0)
                    .interact_text()?;
                SettlementPeriod::monthly(span, start_day, end_day, offset)
            } else {
                SettlementPeriod::yearly(span, start_day, end_day)
            }
        }
    };

    let frequency = if Confirm::with_theme(&theme)
        .with_prompt("Enable a frequency limit?")
        .default(false)
        .interact()?
    {
        let window_units = ["hour", "day", "month", "year"];
        let window_index = Select::with_theme(&theme)
            .with_prompt("Window unit")
            .items(&window_units)
            .default(1)
            .interact()?;
        let window_span: u32 = Input::with_theme(&theme)
            .with_prompt("Window span")
            .default(1)
            .interact_text()?;
        let max_count: u32 = Input::with_theme(&theme)
            .with_prompt("Max occurrences per window")
            .default(1)
            .interact_text()?;
        Some(FrequencyLimit::new(
            parse_window_unit(window_units[window_index])?,
            window_span,
            max_count,
        ))
    } else {
        None
    };

    Ok(CounterService::create(name, icon, settlement, frequency)?)
}

fn print_reminders(counter: &Counter) {
    let Some(config) = counter.reminders.as_ref().filter(|config| !config.is_empty()) else {
        output::info("No reminders configured.");
        return;
    };
    output::section(format!("Reminders — {}", counter.name));
    for reminder in &config.time_reminders {
        let state = if reminder.is_enabled { "on" } else { "off" };
        output::info(format!("time     {} [{}]", reminder.describe(), state));
    }
    for reminder in &config.location_reminders {
        let state = if reminder.is_enabled { "on" } else { "off" };
        output::info(format!("location {} [{}]", reminder.describe(), state));
    }
    output::info(format!(
        "{} trigger condition(s) registered",
        config.trigger_conditions.len()
    ));
}

fn resolve_name(ctx: &ShellContext, args: &[&str]) -> Result<String, CommandError> {
    if let Some(name) = args.first() {
        return Ok((*name).to_string());
    }
    ctx.default_counter_name().ok_or_else(|| {
        CommandError::InvalidArguments("no counter named and none opened recently".into())
    })
}

fn load(ctx: &ShellContext, name: &str) -> Result<Counter, CommandError> {
    ctx.storage.load_counter(name).map_err(|err| match err {
        CoreError::CounterNotFound(_) => CommandError::Failed(format!(
            "No counter named `{}`. Use `list` to see stored counters.",
            name
        )),
        other => CommandError::Core(other),
    })
}

fn format_period(ctx: &ShellContext, period: &Period) -> String {
    format!(
        "{} .. {}",
        period.start_date().format(&ctx.config.date_format),
        period.end_date().format(&ctx.config.date_format)
    )
}

fn format_instant(ctx: &ShellContext, instant: chrono::NaiveDateTime) -> String {
    format!(
        "{} {}",
        instant.format(&ctx.config.date_format),
        instant.format(&ctx.config.time_format)
    )
}

fn settlement_for_cadence(cadence: &str) -> Result<SettlementPeriod, CommandError> {
    match cadence.to_ascii_lowercase().as_str() {
        "daily" => Ok(SettlementPeriod::daily(1)),
        "weekly" => Ok(SettlementPeriod::daily(7)),
        "monthly" => Ok(SettlementPeriod::monthly(1, 1, 31, 0)),
        "yearly" => Ok(SettlementPeriod::yearly(1, 1, 31)),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown cadence `{}`; expected daily, weekly, monthly, or yearly",
            other
        ))),
    }
}

fn parse_icon(tag: &str) -> Result<CounterIcon, CommandError> {
    let tag = tag.to_ascii_lowercase();
    CounterIcon::ALL
        .iter()
        .copied()
        .find(|icon| icon.tag() == tag)
        .ok_or_else(|| {
            let tags: Vec<&str> = CounterIcon::ALL.iter().map(|icon| icon.tag()).collect();
            CommandError::InvalidArguments(format!(
                "unknown icon `{}`; expected one of {}",
                tag,
                tags.join(", ")
            ))
        })
}

fn parse_window_unit(value: &str) -> Result<WindowUnit, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "hour" => Ok(WindowUnit::Hour),
        "day" => Ok(WindowUnit::Day),
        "month" => Ok(WindowUnit::Month),
        "year" => Ok(WindowUnit::Year),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown window unit `{}`; expected hour, day, month, or year",
            other
        ))),
    }
}

fn parse_number(value: &str, what: &str) -> Result<u32, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{} must be a positive number", what)))
}

fn parse_float(value: &str, what: &str) -> Result<f64, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("{} must be a number", what)))
}

fn parse_clock_time(value: &str) -> Result<(u32, u32), CommandError> {
    let error = || CommandError::InvalidArguments("time must be HH:MM".into());
    let (hour, minute) = value.split_once(':').ok_or_else(error)?;
    let hour: u32 = hour.parse().map_err(|_| error())?;
    let minute: u32 = minute.parse().map_err(|_| error())?;
    if hour > 23 || minute > 59 {
        return Err(error());
    }
    Ok((hour, minute))
}
