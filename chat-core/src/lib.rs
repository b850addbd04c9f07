//! # chat-core
//!
//! Shared types for the chat relay: [`ChatRequest`] / [`ChatResponse`] wire types,
//! error types, and tracing initialization. Used by chat-service and telegram-bot.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{ChatError, Result};
pub use logger::init_tracing;
pub use types::{ChatRequest, ChatResponse};
