//! Local bot commands and canned reply texts.

/// Commands handled by the bot itself, without calling the relay backend
/// (except /reset, which clears the server-side thread mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Reset,
    Unknown,
}

pub const GREETING: &str = "\u{1F44B} Hello! I'm an AI chatbot powered by OpenAI.\n\n\
You can:\n\
\u{2022} Send me any message to chat\n\
\u{2022} Use /reset to start a new conversation\n\
\u{2022} Use /help to see this message again\n\n\
Let's chat!";

pub const HELP_TEXT: &str = "\u{1F4DA} Available commands:\n\n\
/start - Start the bot\n\
/help - Show this help message\n\
/reset - Reset conversation history\n\n\
Just send me a message to start chatting!";

pub const RESET_CONFIRMATION: &str = "\u{1F504} Conversation reset! Let's start fresh.";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Use /help to see available commands.";

/// Sent when the relay reply carries no usable text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your message right now.";

/// Sent when handling an update fails entirely.
pub const APOLOGY: &str = "Sorry, an error occurred while processing your message.";

/// Parses a leading-slash command from message text. Only the first
/// whitespace-separated token counts, case-insensitively; non-command text
/// returns `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    if !text.starts_with('/') {
        return None;
    }
    let first = text.split_whitespace().next().unwrap_or(text);
    Some(match first.to_lowercase().as_str() {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/reset" => Command::Reset,
        _ => Command::Unknown,
    })
}
