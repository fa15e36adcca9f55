use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Translated counterpart of the narrative channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedChannels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

impl TranslatedChannels {
    pub fn is_empty(&self) -> bool {
        is_blank(&self.dialogue) && is_blank(&self.action) && is_blank(&self.thought)
    }
}

/// A message decomposed into narrative channels.
///
/// Blank strings carry no information and are treated exactly like absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredMessageContent {
    /// Spoken words, written in "quotes" by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    /// Physical action, written in *asterisks*
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Internal monologue, written in (parentheses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslatedChannels>,
    /// Original text, rendered as plain narration when no channel is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl StructuredMessageContent {
    /// Structure holding only the original text.
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            raw_content: Some(content.into()),
            ..Default::default()
        }
    }

    /// True when at least one of dialogue, action, thought or raw content is non-blank.
    pub fn is_meaningful(&self) -> bool {
        !(is_blank(&self.dialogue)
            && is_blank(&self.action)
            && is_blank(&self.thought)
            && is_blank(&self.raw_content))
    }

    pub fn has_channels(&self) -> bool {
        !(is_blank(&self.dialogue) && is_blank(&self.action) && is_blank(&self.thought))
    }

    /// Copy with every blank field dropped.
    pub fn normalized(&self) -> Self {
        let translation = self
            .translation
            .as_ref()
            .map(|t| TranslatedChannels {
                dialogue: non_blank(&t.dialogue),
                action: non_blank(&t.action),
                thought: non_blank(&t.thought),
            })
            .filter(|t| !t.is_empty());

        Self {
            dialogue: non_blank(&self.dialogue),
            action: non_blank(&self.action),
            thought: non_blank(&self.thought),
            emotion: non_blank(&self.emotion),
            translation,
            raw_content: non_blank(&self.raw_content),
        }
    }

    /// Ordered segments for display.
    ///
    /// Channels come out as action, dialogue, thought, then emotion. When no channel
    /// is set the raw content is returned as a single narrative segment. With
    /// `localized` the translated text replaces each channel it covers; otherwise the
    /// translation is ignored.
    pub fn segments(&self, localized: bool) -> Vec<Segment> {
        let content = self.normalized();
        let translation = if localized {
            content.translation.clone().unwrap_or_default()
        } else {
            TranslatedChannels::default()
        };

        let mut segments = Vec::new();

        if content.has_channels() {
            if let Some(text) = translation.action.or(content.action) {
                segments.push(Segment::Action(text));
            }
            if let Some(text) = translation.dialogue.or(content.dialogue) {
                segments.push(Segment::Dialogue(text));
            }
            if let Some(text) = translation.thought.or(content.thought) {
                segments.push(Segment::Thought(text));
            }
            if let Some(text) = content.emotion {
                segments.push(Segment::Emotion(text));
            }
        } else if let Some(raw) = content.raw_content {
            segments.push(Segment::Narrative(raw));
        }

        segments
    }
}

/// One renderable piece of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Action(String),
    Dialogue(String),
    Thought(String),
    Emotion(String),
    Narrative(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Action(t)
            | Segment::Dialogue(t)
            | Segment::Thought(t)
            | Segment::Emotion(t)
            | Segment::Narrative(t) => t,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Action(_) => "action",
            Segment::Dialogue(_) => "dialogue",
            Segment::Thought(_) => "thought",
            Segment::Emotion(_) => "emotion",
            Segment::Narrative(_) => "narrative",
        }
    }
}

/// Picks the structure to render for a reply.
///
/// A meaningful backend structure wins (with blank fields dropped). Anything else
/// falls back to the flat `content` as raw narration with every channel unset; the
/// text is not parsed any further.
pub fn derive_structure(
    structured: Option<&StructuredMessageContent>,
    content: &str,
) -> StructuredMessageContent {
    match structured {
        Some(s) if s.is_meaningful() => s.normalized(),
        _ => StructuredMessageContent::raw(content),
    }
}

/// One chat turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredMessageContent>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            structured: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(
        content: impl Into<String>,
        structured: Option<StructuredMessageContent>,
    ) -> Self {
        Self {
            structured,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Structure to render, falling back to the flat content.
    pub fn display_structure(&self) -> StructuredMessageContent {
        derive_structure(self.structured.as_ref(), &self.content)
    }

    pub fn segments(&self, localized: bool) -> Vec<Segment> {
        self.display_structure().segments(localized)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}
