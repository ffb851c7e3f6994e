use thiserror::Error;

pub const END_OF_INPUT: &str = "<end>";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("empty label expression")]
    Empty,

    #[error("syntax error at token {position} '{token}': {reason}")]
    Syntax {
        token: String,
        position: usize,
        reason: String,
    },
}

impl ExpressionError {
    pub fn syntax(token: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            token: token.into(),
            position,
            reason: reason.into(),
        }
    }

    pub fn unexpected_end(position: usize, reason: impl Into<String>) -> Self {
        Self::syntax(END_OF_INPUT, position, reason)
    }

    /// Index of the offending token, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Syntax { position, .. } => Some(*position),
        }
    }
}
