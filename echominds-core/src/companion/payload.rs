use super::form::{CompanionFormData, CUSTOM};
use crate::models::CharacterCreateRequest;

const RACE_LABELS: &[(&str, &str)] = &[
    ("human", "Human"),
    ("elf", "Elf"),
    ("dwarf", "Dwarf"),
    ("orc", "Orc"),
    ("demon", "Demon"),
    ("angel", "Angel"),
    ("vampire", "Vampire"),
    ("werewolf", "Werewolf"),
    ("beastkin", "Beastkin"),
    ("dragon", "Dragon"),
    ("android", "Android"),
    ("ai", "Artificial Intelligence"),
    ("spirit", "Spirit"),
];

const ADDRESS_TOKENS: &[(&str, &str)] = &[
    ("casual", "kamu"),
    ("respectful", "Anda"),
    ("intimate", "sayang"),
];

const DEFAULT_ADDRESS: &str = "kamu";

/// Display label for a race code. Unknown codes are returned unchanged.
pub fn race_label(code: &str) -> String {
    let key = code.trim().to_lowercase();
    RACE_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| code.trim().to_string())
}

/// Backend-facing address token for an address preference, `"kamu"` when unknown.
pub fn address_token(preference: &str) -> &'static str {
    let key = preference.trim().to_lowercase();
    ADDRESS_TOKENS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, token)| *token)
        .unwrap_or(DEFAULT_ADDRESS)
}

fn resolve_custom(value: &str, custom: Option<&str>) -> String {
    match custom {
        Some(custom) if value == CUSTOM => custom.trim().to_string(),
        _ => value.to_string(),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

pub fn to_api_payload(data: &CompanionFormData) -> CharacterCreateRequest {
    let basic = &data.basic;
    let relationship = &data.relationship;

    let user_name = non_blank(&relationship.user_name)
        .unwrap_or(basic.name.trim())
        .to_string();

    CharacterCreateRequest {
        name: basic.name.trim().to_string(),
        avatar: basic.avatar.clone(),
        description: basic.description.trim().to_string(),
        category: basic.category.clone(),
        gender: non_blank(&basic.gender).map(str::to_string),
        race: non_blank(&basic.race).map(race_label),
        personality: data.personality.traits.trim().to_string(),
        background: data.personality.background.trim().to_string(),
        language: data.communication.language.clone(),
        conversation_style: data.communication.styles.join(", "),
        relationship_type: resolve_custom(&relationship.kind, relationship.custom_type.as_deref()),
        relationship_role: resolve_custom(&relationship.role, relationship.custom_role.as_deref()),
        relationship_label: relationship.label.trim().to_string(),
        user_name,
        preferred_address: address_token(&relationship.preferred_address).to_string(),
        age_relation: relationship.age_relation.clone(),
        authority_level: relationship.authority_level.clone(),
        emotional_tone: relationship.emotional_tone.clone(),
        greeting: None,
        system_prompt_override: None,
    }
}
