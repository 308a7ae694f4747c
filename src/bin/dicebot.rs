use log::error;
use saphir_dicebot::bot::console::{read_stdin, ConsoleTransport};
use saphir_dicebot::bot::DiceBot;
use saphir_dicebot::config::*;
use saphir_dicebot::error::BotError;
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::filter::EnvFilter;

/// Name console input is attributed to.
const CONSOLE_USER: &str = "console";

#[tokio::main]
async fn main() -> Result<(), BotError> {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("saphir_dicebot=info,dicebot=info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(_) => (),
        Err(e) => error!("Error: {}", e),
    }

    Ok(())
}

async fn run() -> Result<(), BotError> {
    let config_path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: dicebot <config.toml>");
            return Ok(());
        }
    };

    let cfg = Arc::new(read_config(config_path)?);
    let channel = cfg.primary_channel().to_owned();
    let (tx, rx) = mpsc::channel(32);

    let bot = DiceBot::new(&cfg, ConsoleTransport);
    let input = tokio::spawn(async move { read_stdin(CONSOLE_USER, &channel, tx).await });

    bot.run(rx).await?;

    match input.await {
        Ok(result) => result,
        Err(e) => {
            error!("Console reader stopped unexpectedly: {}", e);
            Ok(())
        }
    }
}
