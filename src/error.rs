use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Feed request failed: {0}")]
    #[diagnostic(code(portal::network))]
    Network(String),

    #[error("Feed responded with HTTP {0}")]
    #[diagnostic(code(portal::http_status))]
    HttpStatus(u16),

    #[error("Invalid feed response: {0}")]
    #[diagnostic(code(portal::parse))]
    Parse(String),

    #[error("Rendering failed: {0}")]
    #[diagnostic(code(portal::render))]
    Render(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(portal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(portal::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(portal::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(portal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(portal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(portal::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type PortalResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(message: &str) -> Error {
    Error::Environment(message.to_string())
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create rendering errors
pub fn render_error(message: &str) -> Error {
    Error::Render(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
