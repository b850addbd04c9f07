//! Wire types shared by the relay service and its clients.

use serde::{Deserialize, Serialize};

/// Inbound chat request: the external user id and the message text.
///
/// Fields default to empty strings on deserialization so that missing and
/// empty values take the same validation path at the API boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
        }
    }
}

/// Reply returned for a chat request. `thread_id` is the backend conversation
/// thread serving this user; it is `None` when the pipeline errored before the
/// thread could be determined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub thread_id: Option<String>,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>, thread_id: Option<String>) -> Self {
        Self {
            response: response.into(),
            thread_id,
        }
    }
}
