//! Client-side splitting of roleplay markup.
//!
//! Models are prompted to write `*action*`, `"dialogue"` and `(thought)`. The backend
//! normally sends that split already; this parser exists for replies that arrive as
//! flat text and is only used when the chat session opts in.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::StructuredMessageContent;

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\*(?P<action>[^*]+)\*|"(?P<dialogue>[^"]+)"|\((?P<thought>[^)]+)\)"#)
        .expect("markup regex")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Splits `text` into channels. Never fails; `raw_content` is always the input.
///
/// Spans are matched left to right without overlap, so quotes inside an action stay
/// part of the action. Several spans of one kind are joined with a space. Text outside
/// every marker becomes `emotion`. When nothing matched, the whole text (outer quotes
/// stripped) is taken as dialogue.
pub fn parse_markup(text: &str) -> StructuredMessageContent {
    let mut actions = Vec::new();
    let mut dialogues = Vec::new();
    let mut thoughts = Vec::new();

    for caps in MARKUP_RE.captures_iter(text) {
        let (bucket, span) = if let Some(m) = caps.name("action") {
            (&mut actions, m.as_str())
        } else if let Some(m) = caps.name("dialogue") {
            (&mut dialogues, m.as_str())
        } else if let Some(m) = caps.name("thought") {
            (&mut thoughts, m.as_str())
        } else {
            continue;
        };

        let span = span.trim();
        if !span.is_empty() {
            bucket.push(span);
        }
    }

    let remaining = MARKUP_RE.replace_all(text, " ");
    let remaining = WHITESPACE_RE.replace_all(remaining.trim(), " ").into_owned();

    let mut structured = StructuredMessageContent {
        dialogue: join(&dialogues),
        action: join(&actions),
        thought: join(&thoughts),
        emotion: Some(remaining).filter(|r| !r.is_empty()),
        translation: None,
        raw_content: Some(text.to_string()),
    };

    if !structured.has_channels() {
        let whole = text.trim().trim_matches('"').trim();
        structured.dialogue = Some(whole.to_string()).filter(|d| !d.is_empty());
        structured.emotion = None;
    }

    tracing::debug!(
        dialogue = structured.dialogue.is_some(),
        action = structured.action.is_some(),
        thought = structured.thought.is_some(),
        "Parsed message markup"
    );

    structured
}

fn join(parts: &[&str]) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
