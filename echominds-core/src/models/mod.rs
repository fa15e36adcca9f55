mod api;
mod character;
mod message;

pub use api::{
    CharacterCreateRequest, ChatMetadata, ChatRequest, ChatResponse, ClearConversationResponse,
    ContextMessage, Embedding, ModelConfig, ModelConfigUpdate, ModelList, SystemStatus,
};
pub use character::{Category, Character, ExampleDialogue};
pub use message::{
    derive_structure, Message, Role, Segment, StructuredMessageContent, TranslatedChannels,
};
