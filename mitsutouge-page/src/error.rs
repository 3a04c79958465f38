use thiserror::Error;

use crate::locale::UnknownLocale;

/// Failures raised by a [`crate::Document`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("failed to create <{0}> element")]
    CreateElement(String),
    #[error("failed to set attribute `{name}`: {reason}")]
    Attribute { name: String, reason: String },
    #[error("failed to insert node: {0}")]
    Insert(String),
    #[error("element is detached from the document")]
    Detached,
    #[error("browser error: {0}")]
    Js(String),
}

/// Failures from the host environment around the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("history update failed: {0}")]
    History(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("location unavailable: {0}")]
    Location(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    UnknownLocale(#[from] UnknownLocale),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
