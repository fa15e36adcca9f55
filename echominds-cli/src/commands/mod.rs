pub mod characters;
pub mod chat;
pub mod create;
pub mod model;
pub mod system;
pub mod theme;

pub use characters::{handle_characters_command, CharactersCommand};
pub use chat::{handle_chat_command, ChatArgs};
pub use create::{handle_create_command, CreateArgs};
pub use model::{handle_model_command, ModelCommand};
pub use system::{handle_system_command, SystemCommand};
pub use theme::{handle_theme_command, ThemeCommand};
