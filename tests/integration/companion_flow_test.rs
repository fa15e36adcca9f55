use echominds_core::{
    generate_details, ApiClient, BasicUpdate, CharacterIdentity, CommunicationUpdate,
    CompanionForm, EchoMindsError, PersonalityUpdate, RelationshipUpdate, WizardStep,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn filled_form() -> CompanionForm {
    let mut form = CompanionForm::new();
    form.update_basic(BasicUpdate {
        name: Some("Sylva".to_string()),
        race: Some("elf".to_string()),
        gender: Some("Female".to_string()),
        description: Some("Guardian of an old forest".to_string()),
        category: Some("mystical".to_string()),
        ..Default::default()
    });
    form.next_step();
    form.update_personality(PersonalityUpdate {
        traits: Some("calm, wise".to_string()),
        ..Default::default()
    });
    form.next_step();
    form.update_communication(CommunicationUpdate {
        styles: Some(vec!["poetic".to_string(), "gentle".to_string()]),
        ..Default::default()
    });
    form.next_step();
    form.update_relationship(RelationshipUpdate {
        kind: Some("custom".to_string()),
        custom_type: Some(Some("guardian spirit".to_string())),
        user_name: Some("Traveller".to_string()),
        preferred_address: Some("respectful".to_string()),
        ..Default::default()
    });
    form
}

#[tokio::test]
async fn test_submit_posts_payload_and_resets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/characters"))
        .and(body_partial_json(json!({
            "name": "Sylva",
            "race": "Elf",
            "gender": "Female",
            "personality": "calm, wise",
            "conversationStyle": "poetic, gentle",
            "relationshipType": "guardian spirit",
            "relationshipRole": "equal",
            "userName": "Traveller",
            "preferredAddress": "Anda",
            "language": "id"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "custom-17",
            "name": "Sylva",
            "avatar": "🤖",
            "description": "Guardian of an old forest",
            "chatCount": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let mut form = filled_form();
    assert!(form.is_form_valid());

    let character = form.submit(&client).await.unwrap();
    assert_eq!(character.id, "custom-17");
    assert_eq!(form, CompanionForm::new());
}

#[tokio::test]
async fn test_invalid_form_is_refused_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/characters"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let mut form = filled_form();
    form.update_relationship(RelationshipUpdate {
        custom_type: Some(None),
        ..Default::default()
    });
    assert!(!form.step_validation().is_valid(WizardStep::Relationship));

    let err = form.submit(&client).await.unwrap_err();
    assert!(matches!(err, EchoMindsError::IncompleteCompanionForm(ref s) if s.contains("Relationship")));
    assert_eq!(form.data().basic.name, "Sylva");
}

#[tokio::test]
async fn test_failed_submit_keeps_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/characters"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "Name already taken"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let mut form = filled_form();

    let err = form.submit(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(!err.is_transient());
    assert_eq!(form.current_step(), 3);
    assert_eq!(form.data().basic.name, "Sylva");
}

#[tokio::test]
async fn test_generated_details_fill_personality_step() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "userId": "system-generator",
            "characterId": "system"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "PERSONALITY: calm, ancient, protective\nBACKGROUND: Sylva has guarded the grove for a thousand years.",
            "characterName": "System",
            "conversationId": "gen-1"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let mut form = CompanionForm::new();
    form.update_basic(BasicUpdate {
        name: Some("Sylva".to_string()),
        race: Some("elf".to_string()),
        ..Default::default()
    });

    let identity = CharacterIdentity::from(form.data());
    let details = generate_details(&client, &identity).await;
    form.update_personality(PersonalityUpdate {
        traits: Some(details.personality),
        background: Some(details.background),
    });

    assert_eq!(form.data().personality.traits, "calm, ancient, protective");
    assert!(form.step_validation().is_valid(WizardStep::Personality));
}

#[tokio::test]
async fn test_generator_degrades_when_backend_down() {
    let client = ApiClient::new("http://127.0.0.1:9");
    let identity = CharacterIdentity {
        name: "Rex".to_string(),
        category: "playful".to_string(),
        ..Default::default()
    };

    let details = generate_details(&client, &identity).await;
    assert_eq!(details.personality, "playful, friendly, thoughtful, empathetic");
    assert!(details.background.starts_with("Rex is a character"));
}
