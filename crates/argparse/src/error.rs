use crate::value::{ExtractError, Shape};

/// Errors raised while declaring, binding or retrieving arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid argument name '{name}': {reason}")]
    InvalidNameFormat { name: String, reason: String },

    #[error("argument '{0}' is already declared")]
    DuplicateArgument(String),

    #[error("cannot declare '{attempted}' as final argument: '{existing}' already is")]
    MultipleFinalArguments { existing: String, attempted: String },

    #[error("missing value for '{name}': expected {expected}, found {found}")]
    MissingValue {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("argument '{name}' holds a {found}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: Shape,
        found: Shape,
    },

    #[error("argument '{0}' has no value")]
    Empty(String),
}

impl Error {
    pub(crate) fn from_extract(name: &str, err: ExtractError) -> Self {
        match err {
            ExtractError::TypeMismatch { expected, found } => Self::TypeMismatch {
                name: name.to_string(),
                expected,
                found,
            },
            ExtractError::Empty => Self::Empty(name.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
