use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct MainUserResponse {
    #[serde(default)]
    pub(super) username: Option<String>,
}

/// Body shared by `/upload` and `/processUsername` replies.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct StatusResponse {
    #[serde(default, rename = "taskId")]
    pub(super) task_id: Option<Value>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted { task_id: Option<String> },
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Processed,
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConversationHistory {
    #[serde(default)]
    pub stats: Value,
    #[serde(default)]
    pub favorite_topic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentaryRequest {
    pub name: String,
    pub metric: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Commentary {
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub description: String,
}
