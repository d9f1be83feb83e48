use crate::error::SessionError;

/// One parsed line of operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Add { title: String },
    Refresh,
    Claim,
    Release,
    /// Unsplit `<command> [args...]`; see [`RunLine::parse`].
    Run { line: String },
    Note { content: String },
    Query { text: String },
    Show,
    Logs,
    Memory,
    Workers,
    Help,
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Refresh => "refresh",
            Command::Claim => "claim",
            Command::Release => "release",
            Command::Run { .. } => "run",
            Command::Note { .. } => "note",
            Command::Query { .. } => "query",
            Command::Show => "show",
            Command::Logs => "logs",
            Command::Memory => "memory",
            Command::Workers => "workers",
            Command::Help => "help",
        }
    }
}

/// Splits a trimmed line at the first run of whitespace into a lowercased verb and the
/// untouched remainder. `None` for a blank line.
pub fn split_verb(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };
    Some((verb.to_lowercase(), rest))
}

/// `Ok(None)` for blank input, which is not an error and produces no message.
pub fn parse_command(line: &str) -> Result<Option<Command>, SessionError> {
    let Some((verb, rest)) = split_verb(line) else {
        return Ok(None);
    };
    let rest = rest.to_string();
    let cmd = match verb.as_str() {
        "add" => Command::Add { title: rest },
        "refresh" | "r" => Command::Refresh,
        "claim" => Command::Claim,
        "release" => Command::Release,
        "run" => Command::Run { line: rest },
        "note" => Command::Note { content: rest },
        "query" => Command::Query { text: rest },
        "show" => Command::Show,
        "logs" => Command::Logs,
        "memory" => Command::Memory,
        "workers" => Command::Workers,
        "help" | "h" | "?" => Command::Help,
        _ => return Err(SessionError::UnknownCommand(verb)),
    };
    Ok(Some(cmd))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
}

pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "refresh",
        aliases: &["r"],
        usage: "refresh",
        help: "Reload daemon health and the task list",
    },
    CommandDef {
        name: "add",
        aliases: &[],
        usage: "add <task title>",
        help: "Create a task",
    },
    CommandDef {
        name: "claim",
        aliases: &[],
        usage: "claim",
        help: "Lease the selected task",
    },
    CommandDef {
        name: "release",
        aliases: &[],
        usage: "release",
        help: "Give up the lease on the selected task",
    },
    CommandDef {
        name: "run",
        aliases: &[],
        usage: "run <command> [args...]",
        help: "Run a command against the selected task",
    },
    CommandDef {
        name: "note",
        aliases: &[],
        usage: "note <content>",
        help: "Attach a memory note to the selected task",
    },
    CommandDef {
        name: "query",
        aliases: &[],
        usage: "query <search term>",
        help: "Search memory",
    },
    CommandDef {
        name: "show",
        aliases: &[],
        usage: "show",
        help: "Show the selected task",
    },
    CommandDef {
        name: "logs",
        aliases: &[],
        usage: "logs",
        help: "Show runs of the selected task",
    },
    CommandDef {
        name: "memory",
        aliases: &[],
        usage: "memory",
        help: "Show memory of the selected task",
    },
    CommandDef {
        name: "workers",
        aliases: &[],
        usage: "workers",
        help: "Show worker pool stats",
    },
    CommandDef {
        name: "help",
        aliases: &["h", "?"],
        usage: "help",
        help: "List commands and keys",
    },
];

/// Key bindings, as `(keys, action)` pairs.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Enter", "submit the input line"),
    ("Up/Down", "move the selection (history while typing)"),
    ("Ctrl+R / F5", "refresh"),
    ("Esc", "clear input, close panel, or quit"),
    ("Ctrl+Q / Ctrl+C", "quit"),
];

/// The remainder of a `run` line, split on whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLine {
    pub command: String,
    pub args: Vec<String>,
}

impl RunLine {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let command = parts.next()?;
        Some(Self {
            command,
            args: parts.collect(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/session/command_tests.rs"]
mod tests;
