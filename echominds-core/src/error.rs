//! Error types for the EchoMinds core library.
//!
//! Every fallible operation in the crate returns [`EchoMindsResult`]. Failures are
//! local to the action that triggered them: nothing here is fatal to the process,
//! and callers are expected to surface the message to the user.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Config | Config file, environment and validation errors |
//! | E2001-E2099 | API | Non-2xx responses, transport failures, undecodable bodies |
//! | E3001-E3099 | Chat | Conversation input errors |
//! | E4001-E4099 | Companion | Character creation wizard errors |
//! | E9001-E9099 | General | IO, serialization and validation errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// The main error type for the EchoMinds core library.
#[derive(Debug, Error)]
pub enum EchoMindsError {
    // ========================================================================
    // Configuration Errors (E1001-E1099)
    // ========================================================================
    /// Required configuration value is missing
    #[error("[E1001] Missing required configuration: {0}")]
    MissingConfig(String),

    /// Configuration value failed validation
    #[error("[E1002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Configuration sources could not be read or merged
    #[error("[E1003] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    // ========================================================================
    // API Errors (E2001-E2099)
    // ========================================================================
    /// The backend answered with a non-2xx status.
    ///
    /// `data` holds the parsed JSON body, or the raw text body as a JSON string.
    #[error("[E2001] API error ({status}): {message}")]
    Api {
        message: String,
        status: u16,
        data: serde_json::Value,
    },

    /// No response was received at all
    #[error("[E2002] {message}")]
    Network { message: String },

    /// A 2xx response body did not match the expected shape
    #[error("[E2003] Failed to parse API response: {0}")]
    ApiParseError(String),

    // ========================================================================
    // Chat Errors (E3001-E3099)
    // ========================================================================
    /// Blank chat input
    #[error("[E3001] Message cannot be empty")]
    EmptyMessage,

    /// Character id unknown to the gallery or backend
    #[error("[E3002] Character not found: {0}")]
    CharacterNotFound(String),

    // ========================================================================
    // Companion Errors (E4001-E4099)
    // ========================================================================
    /// Submission attempted while one or more wizard steps are invalid
    #[error("[E4001] Companion form is incomplete: {0}")]
    IncompleteCompanionForm(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// Validation error
    #[error("[E9002] Validation error: {0}")]
    ValidationError(String),

    /// IO error
    #[error("[E9003] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9004] Serialization error: {0}")]
    SerializationError(String),
}

pub type EchoMindsResult<T> = Result<T, EchoMindsError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for EchoMindsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EchoMindsError::ApiParseError(err.to_string())
        } else {
            EchoMindsError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EchoMindsError {
    fn from(err: serde_json::Error) -> Self {
        EchoMindsError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for EchoMindsError {
    fn from(err: std::io::Error) -> Self {
        EchoMindsError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for EchoMindsError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => EchoMindsError::MissingConfig(key),
            other => EchoMindsError::ConfigParseError(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for EchoMindsError {
    fn from(err: toml::de::Error) -> Self {
        EchoMindsError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for EchoMindsError {
    fn from(err: toml::ser::Error) -> Self {
        EchoMindsError::SerializationError(err.to_string())
    }
}

// ============================================================================
// Error categorization
// ============================================================================

impl EchoMindsError {
    /// Wrap a transport failure. The message is prefixed the way the UI shows it.
    pub fn network(message: impl fmt::Display) -> Self {
        EchoMindsError::Network {
            message: format!("Network error: {}", message),
        }
    }

    /// HTTP status carried by the error: the server's status for API errors,
    /// `0` when no usable response arrived (transport failure or unreadable body),
    /// `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            EchoMindsError::Api { status, .. } => Some(*status),
            EchoMindsError::Network { .. } | EchoMindsError::ApiParseError(_) => Some(0),
            _ => None,
        }
    }

    /// Parsed body (or text) attached to an API error.
    pub fn api_data(&self) -> Option<&serde_json::Value> {
        match self {
            EchoMindsError::Api { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            EchoMindsError::Api { .. }
                | EchoMindsError::Network { .. }
                | EchoMindsError::ApiParseError(_)
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EchoMindsError::MissingConfig(_)
                | EchoMindsError::InvalidConfigValue { .. }
                | EchoMindsError::ConfigParseError(_)
        )
    }

    /// Whether trying the same action again later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            EchoMindsError::Network { .. } => true,
            EchoMindsError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            EchoMindsError::MissingConfig(_) => "E1001",
            EchoMindsError::InvalidConfigValue { .. } => "E1002",
            EchoMindsError::ConfigParseError(_) => "E1003",
            EchoMindsError::Api { .. } => "E2001",
            EchoMindsError::Network { .. } => "E2002",
            EchoMindsError::ApiParseError(_) => "E2003",
            EchoMindsError::EmptyMessage => "E3001",
            EchoMindsError::CharacterNotFound(_) => "E3002",
            EchoMindsError::IncompleteCompanionForm(_) => "E4001",
            EchoMindsError::Internal(_) => "E9001",
            EchoMindsError::ValidationError(_) => "E9002",
            EchoMindsError::IoError(_) => "E9003",
            EchoMindsError::SerializationError(_) => "E9004",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            EchoMindsError::MissingConfig(_) | EchoMindsError::ConfigParseError(_) => Some(
                "Check echominds.toml or the ECHOMINDS_* environment variables.",
            ),
            EchoMindsError::InvalidConfigValue { .. } => {
                Some("Fix the configuration value and try again.")
            }
            EchoMindsError::Network { .. } => Some(
                "Make sure the EchoMinds backend is running and ECHOMINDS_API_URL points at it.",
            ),
            EchoMindsError::Api { status, .. } if *status == 404 => {
                Some("The requested resource does not exist on the backend.")
            }
            EchoMindsError::Api { status, .. } if *status >= 500 => {
                Some("The backend failed to process the request. Check the backend logs.")
            }
            EchoMindsError::ApiParseError(_) => {
                Some("The backend version may not match this client.")
            }
            EchoMindsError::EmptyMessage => Some("Type something before sending."),
            EchoMindsError::CharacterNotFound(_) => {
                Some("Run 'echominds characters list' to see available characters.")
            }
            EchoMindsError::IncompleteCompanionForm(_) => {
                Some("Fill in the required fields of every wizard step.")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}

// ============================================================================
// CLI display helper
// ============================================================================

/// Format an error for CLI display with suggestions.
pub struct CliErrorDisplay<'a> {
    error: &'a EchoMindsError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a EchoMindsError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            writeln!(f)?;
            writeln!(f, "  This error may be temporary. Try again shortly.")?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
