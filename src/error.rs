use thiserror::Error;

/// Why a cell could not be compiled into tags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeedError {
    /// The text matches no production of the grammar.
    #[error("syntax error at '{fragment}': {message}")]
    Syntax { fragment: String, message: String },
    /// The grammar accepted a token that the tag generator cannot render.
    #[error("semantic error: {message}")]
    Semantic { message: String },
}

pub type Result<T> = std::result::Result<T, SpeedError>;

impl SpeedError {
    pub(crate) fn syntax(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax { fragment: fragment.into(), message: message.into() }
    }

    pub(crate) fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic { message: message.into() }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
