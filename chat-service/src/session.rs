//! Backend session management: one Assistants API thread per user, one run
//! per inbound message, polled to completion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use assistants_client::{AssistantsClient, RunStatus};
use chat_core::{ChatResponse, Result};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::config::ServiceConfig;
use crate::persona::PersonaLoader;

/// Upper bound on run status polls per message; with the default 1s interval
/// this caps the wait at about a minute.
const MAX_POLL_ATTEMPTS: u32 = 60;

const RUN_FAILED_REPLY: &str = "Sorry, I encountered an error processing your message.";
const NO_RESPONSE_REPLY: &str = "No response";

/// Owns the backend assistant and the user→thread mapping. Shared across
/// request handlers behind an `Arc`.
pub struct SessionManager {
    client: AssistantsClient,
    persona: Arc<PersonaLoader>,
    model: String,
    assistant_name: String,
    assistant_id: String,
    user_threads: Mutex<HashMap<String, String>>,
    poll_interval: Duration,
}

impl SessionManager {
    /// Creates the backend assistant from the current persona and returns the
    /// manager. An error here is fatal to startup: without an assistant no
    /// thread can produce a reply, so the caller must not serve requests.
    pub async fn initialize(
        client: AssistantsClient,
        persona: Arc<PersonaLoader>,
        config: &ServiceConfig,
    ) -> Result<Self> {
        let instructions = persona.current();
        let assistant_id = client
            .create_assistant(&config.model, &config.assistant_name, &instructions)
            .await?;

        Ok(Self {
            client,
            persona,
            model: config.model.clone(),
            assistant_name: config.assistant_name.clone(),
            assistant_id,
            user_threads: Mutex::new(HashMap::new()),
            poll_interval: Duration::from_millis(config.run_poll_interval_ms),
        })
    }

    /// Forwards one user message to the backend and returns the reply.
    ///
    /// Never errors: backend failures degrade to an apologetic reply with a
    /// `None` thread id. A thread mapping created before the failure is kept,
    /// so the user's next message reuses it.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, user_id: &str, text: &str) -> ChatResponse {
        match self.process_message(user_id, text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, user_id = %user_id, "Error processing message");
                ChatResponse::new(format!("Sorry, an error occurred: {}", e), None)
            }
        }
    }

    async fn process_message(&self, user_id: &str, text: &str) -> Result<ChatResponse> {
        let thread_id = self.resolve_thread(user_id).await?;

        self.client.add_user_message(&thread_id, text).await?;

        let run_id = self.client.create_run(&thread_id, &self.assistant_id).await?;
        let status = self.wait_for_run(&thread_id, &run_id).await?;

        if status != RunStatus::Completed {
            error!(
                thread_id = %thread_id,
                run_id = %run_id,
                status = ?status,
                "Run did not complete"
            );
            return Ok(ChatResponse::new(RUN_FAILED_REPLY, Some(thread_id)));
        }

        let reply = self
            .client
            .latest_message_text(&thread_id)
            .await?
            .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string());

        Ok(ChatResponse::new(reply, Some(thread_id)))
    }

    /// Returns the user's thread id, creating a backend thread on first
    /// contact. The map lock is held across the create call so racing first
    /// messages for one user produce exactly one thread.
    async fn resolve_thread(&self, user_id: &str) -> Result<String> {
        let mut threads = self.user_threads.lock().await;
        if let Some(thread_id) = threads.get(user_id) {
            return Ok(thread_id.clone());
        }

        let thread_id = self.client.create_thread().await?;
        info!(thread_id = %thread_id, user_id = %user_id, "Created new thread for user");
        threads.insert(user_id.to_string(), thread_id.clone());
        Ok(thread_id)
    }

    /// Polls the run once per interval until it reaches
    /// completed/failed/cancelled or the attempt budget runs out; returns the
    /// last observed status.
    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<RunStatus> {
        let mut status = RunStatus::Queued;
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(self.poll_interval).await;
            status = self.client.run_status(thread_id, run_id).await?;
            if matches!(
                status,
                RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled
            ) {
                return Ok(status);
            }
            if attempt == MAX_POLL_ATTEMPTS {
                error!(
                    thread_id = %thread_id,
                    run_id = %run_id,
                    attempts = MAX_POLL_ATTEMPTS,
                    "Run polling timed out"
                );
            }
        }
        Ok(status)
    }

    /// Drops the user's thread mapping so the next message starts a fresh
    /// conversation. The backend thread itself is abandoned, not deleted.
    /// Returns the removed thread id; a no-op for unknown users.
    pub async fn reset_thread(&self, user_id: &str) -> Option<String> {
        let removed = self.user_threads.lock().await.remove(user_id);
        if let Some(ref thread_id) = removed {
            info!(thread_id = %thread_id, user_id = %user_id, "Reset thread for user");
        }
        removed
    }

    /// Pushes the currently held persona to the existing backend assistant.
    /// Failure is logged only; the previous configuration stays in effect.
    pub async fn update_persona(&self) {
        let instructions = self.persona.current();
        match self
            .client
            .update_assistant(&self.assistant_id, &self.model, &self.assistant_name, &instructions)
            .await
        {
            Ok(()) => info!(assistant_id = %self.assistant_id, "Updated assistant persona"),
            Err(e) => error!(error = %e, "Failed to update assistant persona"),
        }
    }
}
