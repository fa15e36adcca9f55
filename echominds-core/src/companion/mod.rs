//! Character-creation wizard state and its submission payload.

mod form;
mod payload;

pub use form::{
    BasicInfo, BasicUpdate, CommunicationInfo, CommunicationUpdate, CompanionForm,
    CompanionFormData, PersonalityInfo, PersonalityUpdate, RelationshipInfo, RelationshipUpdate,
    StepValidation, WizardStep, CUSTOM, LAST_STEP, MAX_STYLES,
};
pub use payload::{address_token, race_label, to_api_payload};
