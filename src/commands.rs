//! Line commands accepted in interactive mode.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `topic <text>` / `topic` | Set or clear the search topic |
//! | `locales a, b` / `locales` | Replace or clear the locale list |
//! | `select <name>` / `select` | Set or clear the highlighted locale |
//! | `refresh` | Refetch with the current inputs |
//! | `show` | Re-render the current state |
//! | `help` | Print this table |
//! | `quit` / `exit` | Stop reading commands |

use crate::config::parse_locale_list;
use crate::panel::{ArticlePanel, FetchTicket};

pub const HELP: &str = "commands: topic [text] | locales [a, b, ...] | select [name] | refresh | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Topic(Option<String>),
    Locales(Vec<String>),
    Select(Option<String>),
    Refresh,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<PanelCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let cmd = match word.to_ascii_lowercase().as_str() {
        "topic" => PanelCommand::Topic(arg),
        "locales" => PanelCommand::Locales(parse_locale_list(rest)),
        "select" => PanelCommand::Select(arg),
        "refresh" => PanelCommand::Refresh,
        "show" => PanelCommand::Show,
        "help" | "?" => PanelCommand::Help,
        "quit" | "exit" => PanelCommand::Quit,
        other => return Err(format!("unknown command `{}`; {}", other, HELP)),
    };
    Ok(Some(cmd))
}

/// What the driver should do after a command was applied to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The query changed; run this request.
    Fetch(FetchTicket),
    /// Only the view changed; re-render without touching snapshots.
    Render,
    Help,
    /// The command left the panel as it was.
    Nothing,
    Quit,
}

pub fn apply_command(panel: &mut ArticlePanel, cmd: PanelCommand) -> CommandOutcome {
    let ticket = match cmd {
        PanelCommand::Topic(topic) => panel.set_topic(topic),
        PanelCommand::Locales(locales) => panel.set_locales(locales),
        PanelCommand::Refresh => Some(panel.begin_fetch()),
        PanelCommand::Select(locale) => {
            panel.select_locale(locale);
            return CommandOutcome::Render;
        }
        PanelCommand::Show => return CommandOutcome::Render,
        PanelCommand::Help => return CommandOutcome::Help,
        PanelCommand::Quit => return CommandOutcome::Quit,
    };
    ticket.map_or(CommandOutcome::Nothing, CommandOutcome::Fetch)
}
