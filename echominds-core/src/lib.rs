#![allow(clippy::derivable_impls, clippy::manual_range_contains)]

pub mod chat;
pub mod client;
pub mod companion;
pub mod config;
pub mod error;
pub mod gallery;
pub mod generator;
pub mod markup;
pub mod models;
pub mod router;
pub mod theme;

pub use chat::ChatSession;
pub use client::{ApiBody, ApiClient, ChatBackend};
pub use companion::{
    address_token, race_label, to_api_payload, BasicUpdate, CommunicationUpdate, CompanionForm,
    CompanionFormData, PersonalityUpdate, RelationshipUpdate, StepValidation, WizardStep,
    MAX_STYLES,
};
pub use config::{
    get_config_dir, ApiConfig, ChatConfig, EchoMindsConfig, LoggingConfig,
    ThemeConfig, DEFAULT_API_URL, DEFAULT_USER_ID,
};
pub use error::{CliErrorDisplay, EchoMindsError, EchoMindsResult};
pub use gallery::Gallery;
pub use generator::{
    generate_background, generate_details, generate_personality, CharacterIdentity,
    GeneratedDetails,
};
pub use markup::parse_markup;
pub use models::{
    derive_structure, Category, Character, CharacterCreateRequest, ChatMetadata, ChatRequest,
    ChatResponse, ClearConversationResponse, ContextMessage, Embedding, ExampleDialogue, Message,
    ModelConfig, ModelConfigUpdate, ModelList, Role, Segment, StructuredMessageContent,
    SystemStatus, TranslatedChannels,
};
pub use router::{Route, Router, RouterState};
pub use theme::{FileThemeStorage, MemoryThemeStorage, Theme, ThemeStorage, ThemeStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
