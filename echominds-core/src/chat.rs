use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::ChatBackend;
use crate::error::{EchoMindsError, EchoMindsResult};
use crate::markup::parse_markup;
use crate::models::{ChatRequest, ChatResponse, Message, StructuredMessageContent};

/// In-memory conversation with one character for the active session.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    user_id: String,
    character_id: String,
    conversation_id: Option<String>,
    messages: Vec<Message>,
    parse_markup_fallback: bool,
}

impl ChatSession {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        user_id: impl Into<String>,
        character_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
            character_id: character_id.into(),
            conversation_id: None,
            messages: Vec::new(),
            parse_markup_fallback: false,
        }
    }

    /// Split flat replies on `*action*` / `"dialogue"` / `(thought)` markup when the
    /// backend sends no channels of its own.
    pub fn with_markup_fallback(mut self, enabled: bool) -> Self {
        self.parse_markup_fallback = enabled;
        self
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Drops the local history. The backend's memory is untouched.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
    }

    /// Sends `text` and appends the reply.
    ///
    /// The user turn is recorded before the request goes out and stays even when the
    /// request fails; on failure no assistant turn is added and the error is returned.
    pub async fn send(&mut self, text: &str) -> EchoMindsResult<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EchoMindsError::EmptyMessage);
        }

        self.messages.push(Message::user(text));

        let request = ChatRequest::new(text, &self.user_id, &self.character_id)
            .with_conversation(self.conversation_id.clone());

        debug!(
            character_id = %self.character_id,
            conversation_id = ?self.conversation_id,
            "Sending chat message"
        );

        let response = match self.backend.send_message(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(character_id = %self.character_id, "Chat message failed: {}", e);
                return Err(e);
            }
        };

        if !response.conversation_id.is_empty() {
            self.conversation_id = Some(response.conversation_id.clone());
        }

        let structured = self.structure_reply(&response);
        self.messages.push(Message::assistant(response.reply, Some(structured)));

        self.messages
            .last()
            .ok_or_else(|| EchoMindsError::Internal("reply was not recorded".to_string()))
    }

    fn structure_reply(&self, response: &ChatResponse) -> StructuredMessageContent {
        let has_backend_channels = response
            .structured
            .as_ref()
            .map(StructuredMessageContent::has_channels)
            .unwrap_or(false);

        if self.parse_markup_fallback && !has_backend_channels {
            parse_markup(&response.reply)
        } else {
            response.structured_content()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Character, CharacterCreateRequest, ChatMetadata, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedBackend {
        replies: Mutex<Vec<EchoMindsResult<ChatResponse>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<EchoMindsResult<ChatResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_message(&self, request: &ChatRequest) -> EchoMindsResult<ChatResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(EchoMindsError::Internal("no reply scripted".into())))
        }

        async fn create_character(
            &self,
            _payload: &CharacterCreateRequest,
        ) -> EchoMindsResult<Character> {
            Err(EchoMindsError::Internal("not used".into()))
        }
    }

    fn reply(text: &str, structured: Option<StructuredMessageContent>) -> ChatResponse {
        ChatResponse {
            reply: text.to_string(),
            character_name: "Luna".to_string(),
            conversation_id: "conv-1".to_string(),
            context: Vec::new(),
            metadata: ChatMetadata::default(),
            structured,
        }
    }

    #[tokio::test]
    async fn test_send_records_both_turns() {
        let backend = ScriptedBackend::new(vec![Ok(reply("Hello there", None))]);
        let mut session = ChatSession::new(backend.clone(), "u1", "1");

        let message = session.send("  Hi Luna  ").await.unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(
            message.structured.as_ref().unwrap().raw_content.as_deref(),
            Some("Hello there")
        );

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].content, "Hi Luna");
        assert_eq!(session.conversation_id(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_conversation_id_sent_on_later_turns() {
        let backend = ScriptedBackend::new(vec![Ok(reply("one", None)), Ok(reply("two", None))]);
        let mut session = ChatSession::new(backend.clone(), "u1", "1");

        session.send("first").await.unwrap();
        session.send("second").await.unwrap();

        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].conversation_id.is_none());
        assert_eq!(requests[1].conversation_id.as_deref(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = ChatSession::new(backend.clone(), "u1", "1");

        let err = session.send("   ").await.unwrap_err();
        assert!(matches!(err, EchoMindsError::EmptyMessage));
        assert!(session.messages().is_empty());
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_user_turn_only() {
        let backend = ScriptedBackend::new(vec![Err(EchoMindsError::network("refused"))]);
        let mut session = ChatSession::new(backend, "u1", "1");

        let err = session.send("hello?").await.unwrap_err();
        assert_eq!(err.status(), Some(0));
        assert_eq!(session.messages().len(), 1);
        assert!(session.last().unwrap().is_user());
    }

    #[tokio::test]
    async fn test_markup_fallback_only_when_enabled() {
        let text = r#"*waves* "Hi!""#;

        let backend = ScriptedBackend::new(vec![Ok(reply(text, None))]);
        let mut plain = ChatSession::new(backend, "u1", "1");
        let message = plain.send("hey").await.unwrap();
        assert!(message.structured.as_ref().unwrap().action.is_none());

        let backend = ScriptedBackend::new(vec![Ok(reply(text, None))]);
        let mut parsing = ChatSession::new(backend, "u1", "1").with_markup_fallback(true);
        let message = parsing.send("hey").await.unwrap();
        let structured = message.structured.as_ref().unwrap();
        assert_eq!(structured.action.as_deref(), Some("waves"));
        assert_eq!(structured.dialogue.as_deref(), Some("Hi!"));
        assert_eq!(structured.raw_content.as_deref(), Some(text));
    }

    #[tokio::test]
    async fn test_backend_structure_wins_over_parsing() {
        let structured = StructuredMessageContent {
            thought: Some("hmm".to_string()),
            ..Default::default()
        };
        let backend = ScriptedBackend::new(vec![Ok(reply("*waves*", Some(structured)))]);
        let mut session = ChatSession::new(backend, "u1", "1").with_markup_fallback(true);

        let message = session.send("hey").await.unwrap();
        let structured = message.structured.as_ref().unwrap();
        assert_eq!(structured.thought.as_deref(), Some("hmm"));
        assert!(structured.action.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let backend = ScriptedBackend::new(vec![Ok(reply("hi", None))]);
        let mut session = ChatSession::new(backend, "u1", "1");
        session.send("hi").await.unwrap();

        session.clear();
        assert!(session.messages().is_empty());
        assert!(session.conversation_id().is_none());
    }
}
