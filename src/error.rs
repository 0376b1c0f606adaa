use bindpath_observer::ObserverError;
use bindpath_parser::{Diagnostics, ParseError};
use bindpath_path::PathError;
use thiserror::Error;

/// Errors surfaced by the [`crate::BindingEngine`].
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Binding parse error in '{text}': {diagnostics}")]
    InvalidBinding {
        text: String,
        diagnostics: Diagnostics,
    },

    #[error("Path resolution failed: {0}")]
    Path(#[from] PathError),

    #[error("Observation failed: {0}")]
    Observer(#[from] ObserverError),

    #[error("Expression '{0}' is not a member path")]
    NotMemberPath(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl BindingError {
    pub fn invalid_binding(text: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self::InvalidBinding {
            text: text.into(),
            diagnostics,
        }
    }
}
