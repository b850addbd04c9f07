//! # telegram-bot
//!
//! Telegram front end for the chat relay: forwards free-text messages to
//! chat-service over HTTP and relays the reply back to the chat; handles the
//! /start, /help, and /reset commands locally.

pub mod client;
pub mod commands;
pub mod config;
pub mod runner;

pub use client::{ChatServiceClient, CONNECTION_ERROR_REPLY};
pub use commands::{parse_command, Command};
pub use config::BotConfig;
pub use runner::run_bot;
