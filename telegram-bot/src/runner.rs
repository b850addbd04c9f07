//! REPL runner: receives Telegram updates, dispatches commands, and relays
//! free text through the chat service.

use std::sync::Arc;

use anyhow::Result;
use teloxide::{prelude::*, types::ChatAction};
use tracing::{error, info, warn};

use crate::client::ChatServiceClient;
use crate::commands::{
    parse_command, Command, APOLOGY, FALLBACK_REPLY, GREETING, HELP_TEXT, RESET_CONFIRMATION,
    UNKNOWN_COMMAND,
};
use crate::config::BotConfig;

/// Builds the teloxide Bot from config, honoring the optional Bot API URL
/// override.
pub fn build_bot(config: &BotConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    if let Some(ref url_str) = config.telegram_api_url {
        match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        }
    } else {
        bot
    }
}

/// Starts the long-polling REPL. Each update is handled to completion before
/// replying; a failed update produces one apologetic chat message and is
/// never retried.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    let bot = build_bot(&config);
    let client = Arc::new(ChatServiceClient::new(config.chat_service_url.clone()));

    info!("Starting Telegram bot");
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let client = client.clone();
        async move {
            handle_update(&bot, &client, &msg).await;
            Ok(())
        }
    })
    .await;

    Ok(())
}

/// Top-level catch: any error in the handling path becomes a single apology
/// message to the chat.
async fn handle_update(bot: &Bot, client: &ChatServiceClient, msg: &Message) {
    if let Err(e) = try_handle(bot, client, msg).await {
        error!(error = %e, chat_id = msg.chat.id.0, "Error processing update");
        if let Err(send_err) = bot.send_message(msg.chat.id, APOLOGY).await {
            error!(error = %send_err, chat_id = msg.chat.id.0, "Error sending apology message");
        }
    }
}

async fn try_handle(bot: &Bot, client: &ChatServiceClient, msg: &Message) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    // Channel posts carry no sender; the chat id stands in as the user key.
    let user_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| msg.chat.id.0.to_string());

    info!(user_id = %user_id, chat_id = msg.chat.id.0, message_content = %text, "Received message");

    match parse_command(text) {
        Some(Command::Start) => {
            bot.send_message(msg.chat.id, GREETING).await?;
        }
        Some(Command::Help) => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
        Some(Command::Reset) => {
            client.reset_thread(&user_id).await;
            bot.send_message(msg.chat.id, RESET_CONFIRMATION).await?;
        }
        Some(Command::Unknown) => {
            bot.send_message(msg.chat.id, UNKNOWN_COMMAND).await?;
        }
        None => {
            // Best-effort typing indicator while the relay round-trip runs.
            if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
                warn!(error = %e, chat_id = msg.chat.id.0, "Could not send typing action");
            }

            let reply = client.send_message(&user_id, text).await;
            let text_out = if reply.response.is_empty() {
                FALLBACK_REPLY
            } else {
                reply.response.as_str()
            };
            bot.send_message(msg.chat.id, text_out).await?;
        }
    }

    Ok(())
}
