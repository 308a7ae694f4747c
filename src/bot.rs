use crate::config::Config;
use crate::error::BotError;
use crate::logic::evaluate;
use async_trait::async_trait;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;

pub mod console;

/// An inbound chat message.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Message {
    /// Who sent the message. Replies are addressed to them.
    pub sender: String,

    /// Where the message was sent. Replies go back here.
    pub channel: String,

    pub body: String,
}

impl Message {
    pub fn new(sender: &str, channel: &str, body: &str) -> Message {
        Message {
            sender: sender.to_owned(),
            channel: channel.to_owned(),
            body: body.to_owned(),
        }
    }
}

/// The outbound side of a chat connection. The bot only ever needs to
/// say something in a channel.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError>;
}

/// The DiceBot struct represents an active dice bot. It answers every
/// message that starts with the command prefix by evaluating the rest
/// of the message as a dice formula.
pub struct DiceBot<T: ChatTransport> {
    /// A reference to the configuration read in on application start.
    config: Arc<Config>,

    /// Where replies are sent.
    transport: T,
}

impl<T: ChatTransport> DiceBot<T> {
    pub fn new(config: &Arc<Config>, transport: T) -> Self {
        DiceBot {
            config: config.clone(),
            transport,
        }
    }

    /// The reply for a message, if it is a command. Messages that do
    /// not start with the command prefix are not answered.
    pub fn response_for(&self, message: &Message) -> Option<String> {
        let formula = message.body.strip_prefix(self.config.command_prefix())?;
        let result = evaluate(formula);
        Some(format!("{}, {}", message.sender, result))
    }

    /// Answer a single message on the channel it came from. Returns
    /// whether a reply was attempted.
    pub async fn handle_message(&self, message: &Message) -> Result<bool, BotError> {
        match self.response_for(message) {
            Some(response) => {
                self.transport.send(&message.channel, &response).await?;
                info!(
                    "[{}] {} executed: {}",
                    message.channel, message.sender, message.body
                );
                Ok(true)
            }
            None => {
                debug!("Ignoring non-command message from {}", message.sender);
                Ok(false)
            }
        }
    }

    /// Where the bot is listening and for which prefix. Without a
    /// configured server the bot is on the console.
    fn listening_summary(&self) -> String {
        format!(
            "{} listening on {} for commands prefixed with '{}'",
            self.config.bot_name(),
            self.config.chat_server().unwrap_or("console"),
            self.config.command_prefix()
        )
    }

    /// Process messages until the sending side of the channel is
    /// dropped. A failed reply is logged and does not stop the bot.
    pub async fn run(&self, mut messages: Receiver<Message>) -> Result<(), BotError> {
        info!("{}", self.listening_summary());

        while let Some(message) = messages.recv().await {
            if let Err(e) = self.handle_message(&message).await {
                error!("Error sending message: {}", e);
            }
        }

        info!("Message stream closed, shutting down");
        Ok(())
    }
}
