use thiserror::Error;

/// Errors that can occur when reading or writing optimization variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    #[error("no variable set named `{0}`")]
    UnknownSet(String),

    #[error("a variable set named `{0}` already exists")]
    DuplicateSet(String),

    #[error("`{id}` expects {expected} values, got {got}")]
    LengthMismatch {
        id: String,
        expected: usize,
        got: usize,
    },

    #[error("`{id}` rejected its values: {reason}")]
    Rejected { id: String, reason: String },
}
