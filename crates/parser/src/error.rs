use crate::diagnostics::Diagnostics;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Parse error in '{expression}': {diagnostics}")]
    Invalid {
        expression: String,
        diagnostics: Diagnostics,
    },

    #[error("Expression is empty")]
    Empty,
}

impl ParseError {
    pub fn invalid(expression: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self::Invalid {
            expression: expression.into(),
            diagnostics,
        }
    }

    /// The collected diagnostics, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            ParseError::Invalid { diagnostics, .. } => Some(diagnostics),
            ParseError::Empty => None,
        }
    }
}
