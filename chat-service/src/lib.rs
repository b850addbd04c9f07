//! # chat-service
//!
//! HTTP relay between chat front ends and the OpenAI Assistants API. Keeps one
//! backend thread per user, runs the assistant against it per message, and
//! hot-reloads the assistant's persona from a local file.

pub mod config;
pub mod persona;
pub mod routes;
pub mod session;

pub use config::ServiceConfig;
pub use persona::{PersonaLoader, DEFAULT_PERSONA};
pub use routes::build_router;
pub use session::SessionManager;
