//! Assisted personality and background writing for the creation wizard.
//!
//! Prompts go through the regular chat endpoint as a reserved system user. The
//! generator never fails: any transport error, API error or empty reply degrades to a
//! template built from the identity, so the wizard can always fill its fields.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::ChatBackend;
use crate::companion::CompanionFormData;
use crate::error::{EchoMindsError, EchoMindsResult};
use crate::models::ChatRequest;

pub const GENERATOR_USER_ID: &str = "system-generator";
pub const GENERATOR_CHARACTER_ID: &str = "system";

static PERSONALITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)PERSONALITY:[ \t]*(.+?)[ \t]*(?:BACKGROUND:|$)").expect("personality regex")
});

static BACKGROUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)BACKGROUND:\s*(.+)$").expect("background regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterIdentity {
    pub name: String,
    pub gender: String,
    pub race: String,
    pub category: String,
    pub description: String,
}

impl CharacterIdentity {
    fn profile(&self) -> String {
        format!(
            "- Name: {}\n- Gender: {}\n- Race: {}\n- Category: {}\n- Description: {}",
            self.name, self.gender, self.race, self.category, self.description
        )
    }

    /// "a elf female", skipping blank parts.
    fn kind(&self) -> String {
        let words: Vec<String> = [&self.race, &self.gender]
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if words.is_empty() {
            "a character".to_string()
        } else {
            format!("a {}", words.join(" "))
        }
    }
}

impl From<&CompanionFormData> for CharacterIdentity {
    fn from(data: &CompanionFormData) -> Self {
        Self {
            name: data.basic.name.clone(),
            gender: data.basic.gender.clone(),
            race: data.basic.race.clone(),
            category: data.basic.category.clone(),
            description: data.basic.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDetails {
    pub personality: String,
    pub background: String,
}

fn fallback_traits(identity: &CharacterIdentity) -> String {
    format!("{}, friendly, thoughtful", identity.category)
}

fn fallback_background(identity: &CharacterIdentity) -> String {
    format!(
        "{} is {} with a {} nature. They enjoy meaningful conversations and connecting with others.",
        identity.name,
        identity.kind(),
        identity.category
    )
}

fn fallback_details(identity: &CharacterIdentity) -> GeneratedDetails {
    GeneratedDetails {
        personality: format!("{}, friendly, thoughtful, empathetic", identity.category),
        background: fallback_background(identity),
    }
}

async fn ask(backend: &dyn ChatBackend, prompt: String) -> EchoMindsResult<String> {
    let conversation_id = format!("gen-{}", Utc::now().timestamp_millis());
    debug!(conversation_id = %conversation_id, "Requesting generation");

    let request = ChatRequest::new(prompt, GENERATOR_USER_ID, GENERATOR_CHARACTER_ID)
        .with_conversation(Some(conversation_id));
    let response = backend.send_message(&request).await?;

    let text = response.reply.trim();
    if text.is_empty() {
        return Err(EchoMindsError::ApiParseError(
            "generator returned an empty reply".to_string(),
        ));
    }
    Ok(text.to_string())
}

pub async fn generate_personality(
    backend: &dyn ChatBackend,
    identity: &CharacterIdentity,
) -> String {
    let prompt = format!(
        "Based on this character profile:\n{}\n\n\
         Generate 3-5 personality traits that would fit this character naturally.\n\
         Format: comma-separated traits (e.g., \"friendly, creative, curious, empathetic\").\n\
         Keep it concise and relevant.",
        identity.profile()
    );

    match ask(backend, prompt).await {
        Ok(traits) => traits,
        Err(e) => {
            warn!(error = %e, name = %identity.name, "Personality generation failed, using fallback");
            fallback_traits(identity)
        }
    }
}

pub async fn generate_background(
    backend: &dyn ChatBackend,
    identity: &CharacterIdentity,
    personality: &str,
) -> String {
    let prompt = format!(
        "Based on this character:\n{}\n- Personality: {}\n\n\
         Write a short background story (2-3 sentences) that explains who this character is and their background.\n\
         Make it natural and consistent with the traits. Keep it under 150 words.",
        identity.profile(),
        personality
    );

    match ask(backend, prompt).await {
        Ok(background) => background,
        Err(e) => {
            warn!(error = %e, name = %identity.name, "Background generation failed, using fallback");
            fallback_background(identity)
        }
    }
}

/// Generates traits and a background story in a single round trip.
pub async fn generate_details(
    backend: &dyn ChatBackend,
    identity: &CharacterIdentity,
) -> GeneratedDetails {
    let prompt = format!(
        "Create a character profile based on:\n{}\n\n\
         Generate TWO things:\n\
         1. PERSONALITY: 3-5 traits (comma-separated)\n\
         2. BACKGROUND: 2-3 sentence background story\n\n\
         Format your response exactly as:\n\
         PERSONALITY: [traits here]\n\
         BACKGROUND: [story here]",
        identity.profile()
    );

    match ask(backend, prompt).await {
        Ok(text) => parse_details(&text, identity),
        Err(e) => {
            warn!(error = %e, name = %identity.name, "Detail generation failed, using fallback");
            fallback_details(identity)
        }
    }
}

fn parse_details(text: &str, identity: &CharacterIdentity) -> GeneratedDetails {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let personality = capture(&PERSONALITY_RE).unwrap_or_else(|| fallback_traits(identity));
    let background = capture(&BACKGROUND_RE).unwrap_or_else(|| {
        format!("{} is {} with a warm personality.", identity.name, identity.kind())
    });

    GeneratedDetails {
        personality,
        background,
    }
}
