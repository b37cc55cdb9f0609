//! Error types for argument validation

/// Result type for checks
pub type CheckResult<T> = Result<T, CheckError>;

/// Failure of an argument check.
///
/// The `Display` text is the exact runtime error message the VM raises, so a
/// binding only has to pass `to_string()` to its error function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    /// Wrong type or out of range value
    #[error("{message}")]
    BadArgument {
        /// Absolute stack position of the offending argument
        position: i32,
        /// Explanation inside the parentheses, e.g. `"integer expected, got string"`
        extra: String,
        /// Complete message
        message: String,
    },

    /// Range constraint with `min > max` or a non-finite bound
    #[error("{message}")]
    MalformedRange {
        /// Complete message
        message: String,
    },

    /// `__tostring` produced something other than a string
    #[error("\"__tostring\" metamethod must return a string")]
    ToStringNotString,

    /// Error raised by the VM while running a metamethod
    #[error("{0}")]
    Runtime(String),
}

impl CheckError {
    /// The parenthesised explanation of a bad argument error
    pub fn extra(&self) -> Option<&str> {
        match self {
            CheckError::BadArgument { extra, .. } => Some(extra),
            _ => None,
        }
    }

    /// Stack position of a bad argument error
    pub fn position(&self) -> Option<i32> {
        match self {
            CheckError::BadArgument { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl From<String> for CheckError {
    fn from(s: String) -> Self {
        CheckError::Runtime(s)
    }
}

impl From<&str> for CheckError {
    fn from(s: &str) -> Self {
        CheckError::Runtime(s.to_string())
    }
}
