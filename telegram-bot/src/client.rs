//! HTTP client for the chat relay service.

use chat_core::{ChatRequest, ChatResponse};
use tracing::{error, info};

/// Reply used when the relay service cannot be reached or answers with an
/// error status.
pub const CONNECTION_ERROR_REPLY: &str =
    "Sorry, I'm having trouble connecting to the chatbot service.";

/// Client for chat-service's inbound API. All failures degrade to fixed
/// replies; callers never see transport errors.
pub struct ChatServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Forwards the message to the relay and returns its reply. Transport
    /// failures and non-2xx statuses both yield [`CONNECTION_ERROR_REPLY`]
    /// with no thread id.
    pub async fn send_message(&self, user_id: &str, message: &str) -> ChatResponse {
        match self.post_chat(user_id, message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, user_id = %user_id, "Error calling chat service");
                ChatResponse::new(CONNECTION_ERROR_REPLY, None)
            }
        }
    }

    async fn post_chat(&self, user_id: &str, message: &str) -> anyhow::Result<ChatResponse> {
        let reply = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest::new(user_id, message))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply)
    }

    /// Resets the user's conversation thread. Failures are logged and
    /// swallowed.
    pub async fn reset_thread(&self, user_id: &str) {
        let result = async {
            self.http
                .delete(format!("{}/api/thread/{}", self.base_url, user_id))
                .send()
                .await?
                .error_for_status()?;
            anyhow::Ok(())
        }
        .await;

        match result {
            Ok(()) => info!(user_id = %user_id, "Reset thread for user"),
            Err(e) => error!(error = %e, user_id = %user_id, "Error resetting thread"),
        }
    }
}
