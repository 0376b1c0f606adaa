use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("No member path provider could resolve '{path}'")]
    Unresolved { path: String },
}

impl PathError {
    pub fn unresolved(path: impl Into<String>) -> Self {
        Self::Unresolved { path: path.into() }
    }
}
