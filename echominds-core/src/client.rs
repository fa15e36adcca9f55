use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{EchoMindsConfig, DEFAULT_API_URL};
use crate::error::{EchoMindsError, EchoMindsResult};
use crate::models::{
    Character, CharacterCreateRequest, ChatRequest, ChatResponse, ClearConversationResponse,
    Embedding, ModelConfig, ModelConfigUpdate, ModelList, SystemStatus,
};

const DEFAULT_ERROR_MESSAGE: &str = "API request failed";

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    /// Text bodies become a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            ApiBody::Json(value) => value,
            ApiBody::Text(text) => Value::String(text),
        }
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> EchoMindsResult<T> {
        serde_json::from_value(self.into_value())
            .map_err(|e| EchoMindsError::ApiParseError(e.to_string()))
    }
}

/// Operations the chat session, the companion wizard and the generator need from the
/// backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> EchoMindsResult<ChatResponse>;

    async fn create_character(
        &self,
        payload: &CharacterCreateRequest,
    ) -> EchoMindsResult<Character>;
}

/// Thin JSON client for the EchoMinds backend.
///
/// Calls are independent: no timeout, no retry, no cancellation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &EchoMindsConfig) -> Self {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> EchoMindsResult<Url> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|e| EchoMindsError::network(format!("invalid URL '{}': {}", raw, e)))
    }

    /// Sends one request and classifies the response.
    ///
    /// Non-2xx answers become [`EchoMindsError::Api`] carrying the status and the parsed
    /// body (or text); a request that never got a response becomes
    /// [`EchoMindsError::Network`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> EchoMindsResult<ApiBody> {
        let url = self.endpoint_url(endpoint, query)?;
        debug!(%method, %url, "Sending API request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(serde_json::to_string(&body)?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EchoMindsError::network(e))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|e| EchoMindsError::network(e))?;

        debug!(%method, endpoint, status = status.as_u16(), "Received API response");

        if !status.is_success() {
            let body = if is_json {
                serde_json::from_str(&text)
                    .map(ApiBody::Json)
                    .unwrap_or(ApiBody::Text(text))
            } else {
                ApiBody::Text(text)
            };
            return Err(api_error(status.as_u16(), body));
        }

        if is_json {
            let value = serde_json::from_str(&text)
                .map_err(|e| EchoMindsError::ApiParseError(e.to_string()))?;
            Ok(ApiBody::Json(value))
        } else {
            Ok(ApiBody::Text(text))
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> EchoMindsResult<T> {
        self.request(Method::GET, endpoint, &[], None)
            .await?
            .into_typed()
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> EchoMindsResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(method, endpoint, &[], Some(body))
            .await?
            .into_typed()
    }

    pub async fn check_health(&self) -> EchoMindsResult<Value> {
        Ok(self
            .request(Method::GET, "/api/health", &[], None)
            .await?
            .into_value())
    }

    pub async fn system_status(&self) -> EchoMindsResult<SystemStatus> {
        self.get("/api/status").await
    }

    pub async fn send_message(&self, request: &ChatRequest) -> EchoMindsResult<ChatResponse> {
        self.send_json(Method::POST, "/api/chat", request).await
    }

    pub async fn model_config(&self) -> EchoMindsResult<ModelConfig> {
        self.get("/api/config").await
    }

    pub async fn update_model_config(
        &self,
        update: &ModelConfigUpdate,
    ) -> EchoMindsResult<ModelConfig> {
        self.send_json(Method::PUT, "/api/config", update).await
    }

    pub async fn list_models(&self) -> EchoMindsResult<ModelList> {
        self.get("/api/models").await
    }

    pub async fn list_characters(&self) -> EchoMindsResult<Vec<Character>> {
        self.get("/api/characters").await
    }

    pub async fn create_character(
        &self,
        payload: &CharacterCreateRequest,
    ) -> EchoMindsResult<Character> {
        self.send_json(Method::POST, "/api/characters", payload).await
    }

    pub async fn get_character(&self, character_id: &str) -> EchoMindsResult<Character> {
        self.get(&format!("/api/characters/{}", character_id)).await
    }

    pub async fn clear_conversation(
        &self,
        character_id: &str,
        user_id: &str,
    ) -> EchoMindsResult<ClearConversationResponse> {
        self.request(
            Method::DELETE,
            &format!("/api/conversations/{}/{}", character_id, user_id),
            &[],
            None,
        )
        .await?
        .into_typed()
    }

    /// Diagnostic embedding of `text`.
    pub async fn generate_embedding(&self, text: &str) -> EchoMindsResult<Embedding> {
        self.request(Method::GET, "/api/embed", &[("text", text)], None)
            .await?
            .into_typed()
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_message(&self, request: &ChatRequest) -> EchoMindsResult<ChatResponse> {
        ApiClient::send_message(self, request).await
    }

    async fn create_character(
        &self,
        payload: &CharacterCreateRequest,
    ) -> EchoMindsResult<Character> {
        ApiClient::create_character(self, payload).await
    }
}

/// Builds the error for a non-2xx response.
///
/// The message is the body's `detail` field, else the text body, else a generic one.
fn api_error(status: u16, body: ApiBody) -> EchoMindsError {
    let message = match &body {
        ApiBody::Json(value) => match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Null) | None => value.as_str().map(str::to_string),
            Some(other) => Some(other.to_string()),
        },
        ApiBody::Text(text) => Some(text.clone()),
    }
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    EchoMindsError::Api {
        message,
        status,
        data: body.into_value(),
    }
}
