//! Request and response bodies of the EchoMinds backend HTTP API.

use serde::{Deserialize, Serialize};

use super::message::{derive_structure, Role, StructuredMessageContent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    pub fn new(
        message: impl Into<String>,
        user_id: impl Into<String>,
        character_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            character_id: character_id.into(),
            conversation_id: None,
        }
    }

    pub fn with_conversation(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }
}

/// Retrieved memory the backend used to ground a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub content: String,
    pub role: Role,
    pub timestamp: String,
    #[serde(default)]
    pub relevance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_used: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub context: Vec<ContextMessage>,
    #[serde(default)]
    pub metadata: ChatMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredMessageContent>,
}

impl ChatResponse {
    /// Structure to render for this reply; falls back to `reply` as raw content.
    pub fn structured_content(&self) -> StructuredMessageContent {
        derive_structure(self.structured.as_ref(), &self.reply)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub model_name: String,
    pub cpu_threads: u32,
    pub gpu_layers: i32,
    pub temperature: f64,
    pub context_length: u32,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_memory_used: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_memory_used: Option<f64>,
}

/// Partial model configuration; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_layers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    pub llm_provider: String,
    pub model_loaded: String,
    pub gpu_available: bool,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<serde_json::Value>,
}

impl ModelList {
    /// Best-effort display names: plain strings, or the `name`/`model` field of objects.
    pub fn names(&self) -> Vec<String> {
        self.models
            .iter()
            .filter_map(|m| match m {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(o) => o
                    .get("name")
                    .or_else(|| o.get("model"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearConversationResponse {
    pub message: String,
    #[serde(default)]
    pub deleted_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub embedding: Vec<f32>,
    pub dimension: usize,
    pub model: String,
}

/// Submission body for `POST /api/characters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreateRequest {
    pub name: String,
    pub avatar: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    pub personality: String,
    pub background: String,
    pub language: String,
    pub conversation_style: String,
    pub relationship_type: String,
    pub relationship_role: String,
    pub relationship_label: String,
    pub user_name: String,
    pub preferred_address: String,
    pub age_relation: String,
    pub authority_level: String,
    pub emotional_tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}
