use echominds_core::{ApiClient, ChatSession, EchoMindsError, Role, Segment};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply_body(reply: &str, structured: Option<serde_json::Value>) -> serde_json::Value {
    let mut body = json!({
        "reply": reply,
        "characterName": "Luna",
        "conversationId": "conv-42",
        "context": [],
        "metadata": {"responseTime": 0.8, "tokenCount": 31, "model": "llama3"}
    });
    if let Some(structured) = structured {
        body["structured"] = structured;
    }
    body
}

#[tokio::test]
async fn test_structured_reply_renders_channels() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "*smiles* \"Welcome back!\"",
            Some(json!({
                "action": "smiles",
                "dialogue": "Welcome back!",
                "thought": "",
                "translation": {"dialogue": "Selamat datang kembali!"}
            })),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1");

    let reply = session.send("Hello Luna").await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(
        reply.segments(false),
        vec![
            Segment::Action("smiles".to_string()),
            Segment::Dialogue("Welcome back!".to_string()),
        ]
    );
    assert_eq!(
        reply.segments(true)[1],
        Segment::Dialogue("Selamat datang kembali!".to_string())
    );
}

#[tokio::test]
async fn test_flat_reply_falls_back_to_raw_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply_body("*waves* Hi there", None)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1");

    let reply = session.send("hey").await.unwrap();
    let structure = reply.structured.clone().unwrap();
    assert_eq!(structure.raw_content.as_deref(), Some("*waves* Hi there"));
    assert!(structure.action.is_none());
    assert!(structure.dialogue.is_none());
    assert!(structure.thought.is_none());
    assert_eq!(
        reply.segments(false),
        vec![Segment::Narrative("*waves* Hi there".to_string())]
    );
}

#[tokio::test]
async fn test_markup_fallback_splits_flat_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "*tilts head* \"Really?\" (interesting...)",
            None,
        )))
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1").with_markup_fallback(true);

    let reply = session.send("I saw a comet").await.unwrap();
    let structure = reply.structured.clone().unwrap();
    assert_eq!(structure.action.as_deref(), Some("tilts head"));
    assert_eq!(structure.dialogue.as_deref(), Some("Really?"));
    assert_eq!(structure.thought.as_deref(), Some("interesting..."));
}

#[tokio::test]
async fn test_conversation_continues_with_returned_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"conversationId": "conv-42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Again!", None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("First!", None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1");

    assert_eq!(session.send("one").await.unwrap().content, "First!");
    assert_eq!(session.conversation_id(), Some("conv-42"));
    assert_eq!(session.send("two").await.unwrap().content, "Again!");
    assert_eq!(session.messages().len(), 4);
}

#[tokio::test]
async fn test_api_error_keeps_user_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"detail": "Model is loading"})),
        )
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1");

    let err = session.send("anyone there?").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
    assert!(err.to_string().contains("Model is loading"));
    assert_eq!(err.api_data().unwrap()["detail"], "Model is loading");

    assert_eq!(session.messages().len(), 1);
    assert!(session.messages()[0].is_user());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = Arc::new(ApiClient::new("http://127.0.0.1:9"));
    let mut session = ChatSession::new(client, "u1", "1");

    let err = session.send("hello?").await.unwrap_err();
    assert!(matches!(err, EchoMindsError::Network { .. }));
    assert_eq!(err.status(), Some(0));
    assert!(err.to_string().contains("Network error"));
}

#[tokio::test]
async fn test_blank_message_never_hits_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("x", None)))
        .expect(0)
        .mount(&server)
        .await;

    let client = Arc::new(ApiClient::new(server.uri()));
    let mut session = ChatSession::new(client, "u1", "1");

    assert!(matches!(
        session.send("   ").await,
        Err(EchoMindsError::EmptyMessage)
    ));
    assert!(session.messages().is_empty());
}
