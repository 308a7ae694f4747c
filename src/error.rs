use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigError),

    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// The chat transport refused or failed to deliver a message.
    #[error("could not send message to {channel}: {reason}")]
    SendError { channel: String, reason: String },

    #[error("inbound message channel closed")]
    MessageChannelClosed,
}

/// Grammar failures. Raised before any die is rolled.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DiceParsingError {
    #[error("invalid repeat count: {0:?}")]
    InvalidRepeat(String),

    #[error("invalid subcommand: {0:?}")]
    InvalidSubcommand(String),
}
