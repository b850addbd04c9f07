//! # OpenAI Assistants API client
//!
//! Thin wrapper around [async-openai] for the assistant/thread/run/message
//! lifecycle used by the relay: create or update the assistant, open threads,
//! append user messages, start runs, poll run status, and read the newest
//! reply. Provides token masking for safe logging.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        CreateAssistantRequestArgs, CreateMessageRequestArgs, CreateRunRequestArgs,
        CreateThreadRequestArgs, MessageContent, MessageRole, ModifyAssistantRequest,
    },
    Client,
};
use chat_core::{ChatError, Result};

pub use async_openai::types::RunStatus;

/// Masks an API key for safe logging: first 7 chars + `***` + last 4 chars.
/// Keys of length <= 11 are fully masked as `***`.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 11 {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[token.len() - 4..])
}

fn backend_err(e: impl std::fmt::Display) -> ChatError {
    ChatError::Backend(e.to_string())
}

/// Assistants API client. Wraps the async-openai client.
#[derive(Clone)]
pub struct AssistantsClient {
    client: Arc<Client<OpenAIConfig>>,
}

impl AssistantsClient {
    /// Builds a client using the given API key and the default API base URL.
    pub fn new(api_key: String) -> Self {
        tracing::info!(api_key = %mask_token(&api_key), "Creating assistants client");
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
        }
    }

    /// Builds a client with a custom base URL (e.g. for proxies or mock servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        tracing::info!(
            api_key = %mask_token(&api_key),
            base_url = %base_url,
            "Creating assistants client"
        );
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
        }
    }

    /// Creates an assistant with the given model, display name, and
    /// instructions; returns the backend-assigned assistant id.
    pub async fn create_assistant(
        &self,
        model: &str,
        name: &str,
        instructions: &str,
    ) -> Result<String> {
        let request = CreateAssistantRequestArgs::default()
            .model(model)
            .name(name)
            .instructions(instructions)
            .build()
            .map_err(backend_err)?;

        let assistant = self
            .client
            .assistants()
            .create(request)
            .await
            .map_err(backend_err)?;

        tracing::info!(assistant_id = %assistant.id, model = %model, "Created assistant");
        Ok(assistant.id)
    }

    /// Re-submits model, name, and instructions for an existing assistant.
    pub async fn update_assistant(
        &self,
        assistant_id: &str,
        model: &str,
        name: &str,
        instructions: &str,
    ) -> Result<()> {
        let request = ModifyAssistantRequest {
            model: Some(model.to_string()),
            name: Some(name.to_string()),
            instructions: Some(instructions.to_string()),
            ..Default::default()
        };

        self.client
            .assistants()
            .update(assistant_id, request)
            .await
            .map_err(backend_err)?;

        tracing::info!(assistant_id = %assistant_id, "Updated assistant");
        Ok(())
    }

    /// Opens a new empty conversation thread; returns its id.
    pub async fn create_thread(&self) -> Result<String> {
        let request = CreateThreadRequestArgs::default()
            .build()
            .map_err(backend_err)?;

        let thread = self
            .client
            .threads()
            .create(request)
            .await
            .map_err(backend_err)?;

        Ok(thread.id)
    }

    /// Appends `text` as a user-authored message to the given thread.
    pub async fn add_user_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let request = CreateMessageRequestArgs::default()
            .role(MessageRole::User)
            .content(text.to_string())
            .build()
            .map_err(backend_err)?;

        self.client
            .threads()
            .messages(thread_id)
            .create(request)
            .await
            .map_err(backend_err)?;

        Ok(())
    }

    /// Starts a run of the assistant against the thread; returns the run id.
    pub async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String> {
        let request = CreateRunRequestArgs::default()
            .assistant_id(assistant_id)
            .build()
            .map_err(backend_err)?;

        let run = self
            .client
            .threads()
            .runs(thread_id)
            .create(request)
            .await
            .map_err(backend_err)?;

        Ok(run.id)
    }

    /// Fetches the current status of a run.
    pub async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus> {
        let run = self
            .client
            .threads()
            .runs(thread_id)
            .retrieve(run_id)
            .await
            .map_err(backend_err)?;

        tracing::debug!(thread_id = %thread_id, run_id = %run_id, status = ?run.status, "Run status");
        Ok(run.status)
    }

    /// Returns the text of the newest message on the thread (the backend lists
    /// messages most-recent-first), or `None` when the thread has no messages.
    /// A newest message whose first content block is not text is an error.
    pub async fn latest_message_text(&self, thread_id: &str) -> Result<Option<String>> {
        let list = self
            .client
            .threads()
            .messages(thread_id)
            .list(&[("limit", "20")])
            .await
            .map_err(backend_err)?;

        let Some(message) = list.data.first() else {
            return Ok(None);
        };

        match message.content.first() {
            Some(MessageContent::Text(text)) => Ok(Some(text.text.value.clone())),
            Some(_) => Err(ChatError::Backend(
                "first content block of the newest message is not text".to_string(),
            )),
            None => Err(ChatError::Backend(
                "newest message has no content blocks".to_string(),
            )),
        }
    }
}
