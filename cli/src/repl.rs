//! Line protocol for driving the service from a terminal or a pipe.
//!
//! Lines starting with `/erfx` are chat commands; everything else is a
//! simulated host notification.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use erfx_core::signal_processor::director::{ContentType, DirectorUpdate, category};
use erfx_core::signal_processor::{ConditionFlag, HostEvent};

const CHAT_COMMAND: &str = "/erfx";

#[derive(Parser)]
#[command(name = "erfx", disable_version_flag = true)]
struct Repl {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand)]
enum ReplCommand {
    /// Player falls unconscious (--recover clears it)
    Down {
        #[arg(long)]
        recover: bool,
    },
    /// In-combat condition
    Combat { state: Toggle },
    /// Bound-by-duty condition
    Duty { state: Toggle },
    /// Enter a territory: dungeon, trial, raid, ultimate, a numeric code, or none
    Territory { content: String },
    /// Director update by name or hex code (e.g. complete, music, 0x40000001)
    Director { update: String },
    /// Chat line as printed by the game
    Chat {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },
    /// Host sound effects setting
    Sfx { state: Toggle },
    /// Write the current overlay frame to a PNG
    Snap { path: PathBuf },
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn on(self) -> bool {
        self == Toggle::On
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Chat(String),
    Host(HostEvent),
    Sfx(bool),
    Snapshot(PathBuf),
    Exit,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    if let Some(rest) = line.strip_prefix(CHAT_COMMAND) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Ok(Input::Chat(rest.trim().to_string()));
        }
    }

    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "erfx".to_string());
    let repl = Repl::try_parse_from(args).map_err(|e| e.to_string())?;

    let input = match repl.command {
        ReplCommand::Down { recover } => condition(ConditionFlag::Unconscious, !recover),
        ReplCommand::Combat { state } => condition(ConditionFlag::InCombat, state.on()),
        ReplCommand::Duty { state } => condition(ConditionFlag::BoundByDuty, state.on()),
        ReplCommand::Territory { content } => Input::Host(HostEvent::TerritoryChanged {
            content_type: parse_content(&content)?,
        }),
        ReplCommand::Director { update } => Input::Host(HostEvent::DirectorUpdate {
            category: category::DIRECTOR_UPDATE,
            update_type: parse_director(&update)?,
        }),
        ReplCommand::Chat { text } => Input::Host(HostEvent::ChatMessage {
            text: text.join(" "),
        }),
        ReplCommand::Sfx { state } => Input::Sfx(state.on()),
        ReplCommand::Snap { path } => Input::Snapshot(path),
        ReplCommand::Exit => Input::Exit,
    };
    Ok(input)
}

fn condition(flag: ConditionFlag, value: bool) -> Input {
    Input::Host(HostEvent::ConditionChanged { flag, value })
}

fn parse_content(content: &str) -> Result<Option<u32>, String> {
    let code = match content.to_ascii_lowercase().as_str() {
        "none" => return Ok(None),
        "dungeon" => ContentType::Dungeon as u32,
        "trial" => ContentType::Trial as u32,
        "raid" => ContentType::Raid as u32,
        "ultimate" => ContentType::Ultimate as u32,
        other => other
            .parse()
            .map_err(|_| format!("error: unknown content type '{content}'"))?,
    };
    Ok(Some(code))
}

fn parse_director(update: &str) -> Result<u32, String> {
    let named = match update.to_ascii_lowercase().as_str() {
        "commence" => Some(DirectorUpdate::DutyCommence),
        "complete" => Some(DirectorUpdate::DutyComplete),
        "wipe" => Some(DirectorUpdate::DutyWipe),
        "recommence" => Some(DirectorUpdate::DutyRecommence),
        "music" => Some(DirectorUpdate::MusicChange),
        _ => None,
    };
    if let Some(named) = named {
        return Ok(named.code());
    }

    let hex = update.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(hex, 16).map_err(|_| format!("error: invalid director update '{update}'"))
}
