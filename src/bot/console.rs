use super::{ChatTransport, Message};
use crate::error::BotError;
use async_trait::async_trait;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::Sender;

/// Transport that writes replies to standard output, one line per
/// message, tagged with the channel.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

/// How a reply is shown on the console.
fn console_line(channel: &str, text: &str) -> String {
    format!("[{}] {}\n", channel, text)
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError> {
        let mut stdout = io::stdout();
        stdout
            .write_all(console_line(channel, text).as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Forward every line from `reader` as a message from `sender` in
/// `channel`. Returns when input ends.
pub async fn read_lines<R>(
    reader: R,
    sender: &str,
    channel: &str,
    messages: Sender<Message>,
) -> Result<(), BotError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        messages
            .send(Message::new(sender, channel, &line))
            .await
            .map_err(|_| BotError::MessageChannelClosed)?;
    }

    Ok(())
}

/// Forward standard input lines as messages.
pub async fn read_stdin(
    sender: &str,
    channel: &str,
    messages: Sender<Message>,
) -> Result<(), BotError> {
    read_lines(BufReader::new(io::stdin()), sender, channel, messages).await
}
