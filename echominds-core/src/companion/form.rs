use serde::{Deserialize, Serialize};
use tracing::info;

use super::payload::to_api_payload;
use crate::client::ChatBackend;
use crate::error::{EchoMindsError, EchoMindsResult};
use crate::models::Character;

/// Sentinel value of `relationship.type` / `relationship.role` that switches to the
/// free-text custom field.
pub const CUSTOM: &str = "custom";

/// Maximum number of conversation styles a companion can have.
pub const MAX_STYLES: usize = 3;

pub const LAST_STEP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Identity,
    Personality,
    Communication,
    Relationship,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Identity,
            WizardStep::Personality,
            WizardStep::Communication,
            WizardStep::Relationship,
        ]
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        Self::all().get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Identity => 0,
            WizardStep::Personality => 1,
            WizardStep::Communication => 2,
            WizardStep::Relationship => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Identity => "Basic Identity",
            WizardStep::Personality => "Personality & Background",
            WizardStep::Communication => "Communication Style",
            WizardStep::Relationship => "Relationship Dynamics",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    pub avatar: String,
    pub gender: String,
    pub race: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityInfo {
    pub traits: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationInfo {
    pub language: String,
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_role: Option<String>,
    pub user_name: String,
    pub preferred_address: String,
    pub age_relation: String,
    pub authority_level: String,
    pub emotional_tone: String,
}

/// Draft of a new companion, alive for one run of the creation wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionFormData {
    pub basic: BasicInfo,
    pub personality: PersonalityInfo,
    pub communication: CommunicationInfo,
    pub relationship: RelationshipInfo,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            avatar: "🤖".to_string(),
            gender: String::new(),
            race: String::new(),
            description: String::new(),
            category: "supportive".to_string(),
        }
    }
}

impl Default for CommunicationInfo {
    fn default() -> Self {
        Self {
            language: "id".to_string(),
            styles: vec!["friendly".to_string()],
        }
    }
}

impl Default for RelationshipInfo {
    fn default() -> Self {
        Self {
            kind: "friend".to_string(),
            role: "equal".to_string(),
            label: String::new(),
            custom_type: None,
            custom_role: None,
            user_name: String::new(),
            preferred_address: "kamu".to_string(),
            age_relation: "same".to_string(),
            authority_level: "equal".to_string(),
            emotional_tone: "warm".to_string(),
        }
    }
}

impl Default for CompanionFormData {
    fn default() -> Self {
        Self {
            basic: BasicInfo::default(),
            personality: PersonalityInfo::default(),
            communication: CommunicationInfo::default(),
            relationship: RelationshipInfo::default(),
        }
    }
}

// ============================================================================
// Partial updates
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityUpdate {
    pub traits: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationUpdate {
    pub language: Option<String>,
    pub styles: Option<Vec<String>>,
}

/// `custom_type` / `custom_role` use a nested option: `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipUpdate {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub custom_type: Option<Option<String>>,
    pub custom_role: Option<Option<String>>,
    pub user_name: Option<String>,
    pub preferred_address: Option<String>,
    pub age_relation: Option<String>,
    pub authority_level: Option<String>,
    pub emotional_tone: Option<String>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Drops duplicates (first occurrence wins) and caps the list at [`MAX_STYLES`].
fn normalize_styles(styles: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(MAX_STYLES);
    for style in styles {
        let style = style.trim().to_string();
        if style.is_empty() || unique.contains(&style) {
            continue;
        }
        if unique.len() == MAX_STYLES {
            break;
        }
        unique.push(style);
    }
    unique
}

// ============================================================================
// Validation
// ============================================================================

/// Validity of each wizard step, derived from one form snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepValidation([bool; 4]);

impl StepValidation {
    pub fn of(data: &CompanionFormData) -> Self {
        let basic = &data.basic;
        let relationship = &data.relationship;

        let identity = filled(&basic.name) && filled(&basic.description);
        let personality = filled(&data.personality.traits);
        let communication = !data.communication.styles.is_empty();
        let relationship_ok = filled(&relationship.user_name)
            && custom_resolved(&relationship.kind, relationship.custom_type.as_deref())
            && custom_resolved(&relationship.role, relationship.custom_role.as_deref());

        Self([identity, personality, communication, relationship_ok])
    }

    pub fn is_valid(&self, step: WizardStep) -> bool {
        self.0[step.index()]
    }

    pub fn all_valid(&self) -> bool {
        self.0.iter().all(|v| *v)
    }

    pub fn invalid_steps(&self) -> Vec<WizardStep> {
        WizardStep::all()
            .iter()
            .copied()
            .filter(|s| !self.is_valid(*s))
            .collect()
    }

    pub fn as_array(&self) -> [bool; 4] {
        self.0
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn custom_resolved(value: &str, custom: Option<&str>) -> bool {
    value != CUSTOM || custom.map(filled).unwrap_or(false)
}

// ============================================================================
// Store
// ============================================================================

/// Owned state of the creation wizard. The update methods are the only mutation path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanionForm {
    data: CompanionFormData,
    step: usize,
}

impl CompanionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &CompanionFormData {
        &self.data
    }

    pub fn update_basic(&mut self, update: BasicUpdate) {
        let basic = &mut self.data.basic;
        merge(&mut basic.name, update.name);
        merge(&mut basic.avatar, update.avatar);
        merge(&mut basic.gender, update.gender);
        merge(&mut basic.race, update.race);
        merge(&mut basic.description, update.description);
        merge(&mut basic.category, update.category);
    }

    pub fn update_personality(&mut self, update: PersonalityUpdate) {
        let personality = &mut self.data.personality;
        merge(&mut personality.traits, update.traits);
        merge(&mut personality.background, update.background);
    }

    pub fn update_communication(&mut self, update: CommunicationUpdate) {
        let communication = &mut self.data.communication;
        merge(&mut communication.language, update.language);
        merge(
            &mut communication.styles,
            update.styles.map(normalize_styles),
        );
    }

    pub fn update_relationship(&mut self, update: RelationshipUpdate) {
        let relationship = &mut self.data.relationship;
        merge(&mut relationship.kind, update.kind);
        merge(&mut relationship.role, update.role);
        merge(&mut relationship.label, update.label);
        merge(&mut relationship.custom_type, update.custom_type);
        merge(&mut relationship.custom_role, update.custom_role);
        merge(&mut relationship.user_name, update.user_name);
        merge(&mut relationship.preferred_address, update.preferred_address);
        merge(&mut relationship.age_relation, update.age_relation);
        merge(&mut relationship.authority_level, update.authority_level);
        merge(&mut relationship.emotional_tone, update.emotional_tone);
    }

    /// Adds `style` when absent and under the cap, removes it when present.
    /// Returns whether the selection changed.
    pub fn toggle_style(&mut self, style: &str) -> bool {
        let style = style.trim();
        let styles = &mut self.data.communication.styles;

        if let Some(pos) = styles.iter().position(|s| s == style) {
            styles.remove(pos);
            true
        } else if !style.is_empty() && styles.len() < MAX_STYLES {
            styles.push(style.to_string());
            true
        } else {
            false
        }
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn current_wizard_step(&self) -> WizardStep {
        WizardStep::from_index(self.step).unwrap_or(WizardStep::Relationship)
    }

    pub fn next_step(&mut self) {
        self.step = (self.step + 1).min(LAST_STEP);
    }

    pub fn prev_step(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    pub fn go_to_step(&mut self, step: i64) {
        self.step = step.clamp(0, LAST_STEP as i64) as usize;
    }

    pub fn is_first_step(&self) -> bool {
        self.step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.step == LAST_STEP
    }

    pub fn step_validation(&self) -> StepValidation {
        StepValidation::of(&self.data)
    }

    pub fn is_form_valid(&self) -> bool {
        self.step_validation().all_valid()
    }

    pub fn reset(&mut self) {
        self.data = CompanionFormData::default();
        self.step = 0;
    }

    /// Posts the draft and resets the wizard once the backend accepted it.
    ///
    /// An invalid form is refused before any request is made and left untouched, as is
    /// the form after a failed request.
    pub async fn submit(&mut self, backend: &dyn ChatBackend) -> EchoMindsResult<Character> {
        let validation = self.step_validation();
        if !validation.all_valid() {
            let steps: Vec<&str> = validation
                .invalid_steps()
                .iter()
                .map(WizardStep::title)
                .collect();
            return Err(EchoMindsError::IncompleteCompanionForm(steps.join(", ")));
        }

        let payload = to_api_payload(&self.data);
        let character = backend.create_character(&payload).await?;

        info!(
            character_id = %character.id,
            name = %character.name,
            "Companion created"
        );

        self.reset();
        Ok(character)
    }
}
