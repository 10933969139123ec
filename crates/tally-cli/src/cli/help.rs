use crate::cli::output;

pub struct HelpTopic {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const TOPICS: &[HelpTopic] = &[
    HelpTopic {
        name: "list",
        usage: "list",
        summary: "List stored counters with cadence and lifetime totals",
    },
    HelpTopic {
        name: "create",
        usage: "create [<name> [daily|weekly|monthly|yearly]]",
        summary: "Create a counter; with no arguments an interactive form opens",
    },
    HelpTopic {
        name: "show",
        usage: "show [<name>]",
        summary: "Show the active settlement period, count, and remaining allowance",
    },
    HelpTopic {
        name: "tick",
        usage: "tick [<name>]",
        summary: "Record one occurrence now (refused when the frequency window is full)",
    },
    HelpTopic {
        name: "history",
        usage: "history [<name>]",
        summary: "List every settlement period since the first occurrence, newest first",
    },
    HelpTopic {
        name: "entries",
        usage: "entries <name> <period-index>",
        summary: "List the occurrence timestamps inside one historical period",
    },
    HelpTopic {
        name: "rename",
        usage: "rename <name> <new name...>",
        summary: "Change a counter's display name (the storage key is kept)",
    },
    HelpTopic {
        name: "icon",
        usage: "icon <name> <tag>",
        summary: "Change a counter's icon tag",
    },
    HelpTopic {
        name: "period",
        usage: "period <name> day <span> | period <name> month|year <span> <start-day> <end-day> [offset]",
        summary: "Replace the settlement definition; history is re-derived",
    },
    HelpTopic {
        name: "limit",
        usage: "limit <name> <hour|day|month|year> <span> <max> | limit <name> off",
        summary: "Install or remove the rolling frequency limit",
    },
    HelpTopic {
        name: "remind",
        usage: "remind <name> list | time <HH:MM> [daily|weekly|monthly] | location <lat> <lng> <radius> [label] | clear",
        summary: "Manage time and location reminders",
    },
    HelpTopic {
        name: "delete",
        usage: "delete <name>",
        summary: "Delete a counter and its whole occurrence log",
    },
    HelpTopic {
        name: "config",
        usage: "config",
        summary: "Show the configuration file path and current values",
    },
    HelpTopic {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

pub fn print_help(args: &[&str]) {
    if let Some(name) = args.first() {
        match TOPICS.iter().find(|topic| topic.name == *name) {
            Some(topic) => {
                output::info(format!("{} — {}", topic.usage, topic.summary));
            }
            None => {
                output::warning(format!("No help for `{}`.", name));
            }
        }
        return;
    }

    output::section("Commands");
    for topic in TOPICS {
        output::info(format!("{:<10} {}", topic.name, topic.summary));
    }
    output::info("Type `help <command>` for usage details.");
}
