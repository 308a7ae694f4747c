use serde::{self, Deserialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix that marks a chat message as a dice command, unless the
/// config says otherwise.
pub const DEFAULT_COMMAND_PREFIX: char = '!';

/// Channel used when the config does not list any.
const DEFAULT_CHANNEL: &str = "console";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("toml parsing error: {0}")]
    TomlParsingError(#[from] toml::de::Error),
}

pub fn read_config<P: Into<PathBuf>>(config_path: P) -> Result<Config, ConfigError> {
    let config_path = config_path.into();
    let config = {
        let contents = fs::read_to_string(&config_path)?;
        deserialize_config(&contents)?
    };

    Ok(config)
}

fn deserialize_config(contents: &str) -> Result<Config, ConfigError> {
    let config = toml::from_str(contents)?;
    Ok(config)
}

/// The "bot" section of the config file, for bot settings.
#[derive(Deserialize, Clone, Debug)]
struct BotConfig {
    /// Nickname the bot presents to the chat server.
    name: String,

    /// Character a message must start with to be treated as a roll.
    command_prefix: Option<char>,
}

/// The "chat" section of the config, which gives the server and the
/// channels to join. Both are optional for the console front end.
#[derive(Deserialize, Clone, Debug)]
struct ChatConfig {
    /// Chat server host name.
    server: Option<String>,

    /// Channels to listen in.
    #[serde(default)]
    channels: Vec<String>,
}

/// Represents the toml config file for the dicebot. The sections of
/// the config are not directly accessible; instead the config
/// provides friendly methods that handle default values, etc.
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    bot: BotConfig,
    chat: ChatConfig,
}

impl Config {
    /// The nickname of the bot.
    #[inline]
    #[must_use]
    pub fn bot_name(&self) -> &str {
        &self.bot.name
    }

    /// The command prefix character. Falls back to
    /// DEFAULT_COMMAND_PREFIX ('!') when not configured.
    #[inline]
    #[must_use]
    pub fn command_prefix(&self) -> char {
        self.bot.command_prefix.unwrap_or(DEFAULT_COMMAND_PREFIX)
    }

    /// The chat server to connect to, if one is configured.
    #[inline]
    #[must_use]
    pub fn chat_server(&self) -> Option<&str> {
        self.chat.server.as_deref()
    }

    /// The channel console input is attributed to: the first
    /// configured channel, or "console" if there are none.
    #[must_use]
    pub fn primary_channel(&self) -> &str {
        self.chat
            .channels
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_CHANNEL)
    }
}
