//! Binary for the chat relay service.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use assistants_client::AssistantsClient;
use chat_service::{build_router, PersonaLoader, ServiceConfig, SessionManager};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::load()?;
    chat_core::init_tracing(config.log_file.as_deref())?;

    let persona = Arc::new(PersonaLoader::new(config.persona_file.clone()));
    persona.load();

    let client = match &config.openai_base_url {
        Some(base_url) => {
            AssistantsClient::with_base_url(config.openai_api_key.clone(), base_url.clone())
        }
        None => AssistantsClient::new(config.openai_api_key.clone()),
    };

    // Assistant creation must succeed before any request is served.
    let session = Arc::new(SessionManager::initialize(client, persona.clone(), &config).await?);

    spawn_persona_reload(
        persona,
        session.clone(),
        Duration::from_secs(config.persona_poll_interval_secs),
    );

    let addr = SocketAddr::from((config.host.parse::<IpAddr>()?, config.port));
    info!(addr = %addr, "Starting chat service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(session)).await?;

    Ok(())
}

/// Periodically rechecks the persona file; when it was actually reloaded the
/// new instructions are pushed to the backend assistant.
fn spawn_persona_reload(
    persona: Arc<PersonaLoader>,
    session: Arc<SessionManager>,
    interval: Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; the initial load already happened.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if persona.check_and_reload() {
                session.update_persona().await;
            }
        }
    });
}
