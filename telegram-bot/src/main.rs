//! Binary for the Telegram front end.

use anyhow::Result;
use telegram_bot::{run_bot, BotConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;
    chat_core::init_tracing(config.log_file.as_deref())?;

    run_bot(config).await
}
