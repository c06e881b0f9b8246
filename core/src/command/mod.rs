//! `/erfx` chat command surface

use clap::{Parser, Subcommand};
use erfx_types::formatting::{format_volume, percent_to_volume};
use thiserror::Error;

use crate::audio::AudioPlayer;
use crate::config::{ConfigError, ConfigStore};

pub const USAGE_HINT: &str = "Please use \"/erfx vol <num>\" to control volume";
pub const VOLUME_RANGE_ERROR: &str = "Please use a number between 0-100";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Please use a number between 0-100")]
    InvalidVolume,

    #[error("{0}")]
    Usage(String),

    #[error("Failed to save settings: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser)]
#[command(name = "/erfx", about = "Elden Ring style overlay effects", disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the effect volume (0-100)
    Vol { level: String },
}

/// A parsed `/erfx` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetVolume(u8),
    OpenSettings,
}

impl Command {
    /// Parse the argument string that followed `/erfx`.
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let mut argv = shlex::split(args)
            .ok_or_else(|| CommandError::Usage("error: Invalid quoting".to_string()))?;
        if argv.is_empty() {
            return Ok(Command::OpenSettings);
        }
        argv.insert(0, "/erfx".to_string());
        let cli = Cli::try_parse_from(argv).map_err(|e| CommandError::Usage(e.to_string()))?;

        match cli.command {
            Some(Commands::Vol { level }) => parse_percent(&level).map(Command::SetVolume),
            None => Ok(Command::OpenSettings),
        }
    }
}

fn parse_percent(level: &str) -> Result<u8, CommandError> {
    match level.trim().parse::<u8>() {
        Ok(percent) if percent <= 100 => Ok(percent),
        _ => Err(CommandError::InvalidVolume),
    }
}

/// User-facing result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    pub is_error: bool,
    /// Host should open the settings window
    pub open_settings: bool,
}

impl CommandReply {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            open_settings: false,
        }
    }

    fn error(err: &CommandError) -> Self {
        Self {
            text: err.to_string(),
            is_error: true,
            open_settings: false,
        }
    }
}

/// Parse and execute `args`, always producing a reply.
pub fn run(args: &str, audio: &dyn AudioPlayer, config: &dyn ConfigStore) -> CommandReply {
    let command = match Command::parse(args) {
        Ok(command) => command,
        Err(err) => {
            tracing::warn!(args, error = %err, "Rejected command");
            return CommandReply::error(&err);
        }
    };

    match execute(command, audio, config) {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            CommandReply::error(&err)
        }
    }
}

fn execute(
    command: Command,
    audio: &dyn AudioPlayer,
    config: &dyn ConfigStore,
) -> Result<CommandReply, CommandError> {
    match command {
        Command::OpenSettings => Ok(CommandReply {
            open_settings: true,
            ..CommandReply::info(USAGE_HINT)
        }),
        Command::SetVolume(percent) => {
            let volume = percent_to_volume(percent);
            config.set_volume(volume)?;
            audio.set_volume(volume);
            tracing::debug!(percent, "Volume changed");
            Ok(CommandReply::info(format!(
                "Volume set to {}",
                format_volume(volume)
            )))
        }
    }
}
