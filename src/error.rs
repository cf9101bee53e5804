use std::fmt;

/// Result type for Vanguard operations
pub type Result<T> = std::result::Result<T, VanguardError>;

/// Main error type for the Vanguard controller
#[derive(Debug, Clone, PartialEq)]
pub enum VanguardError {
    /// Vector lengths disagree (weights vs features)
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// A persisted weight line could not be parsed
    MalformedWeights {
        line: usize,
        content: String,
    },

    /// Target selection was asked to choose from nothing
    EmptyCandidates,
}

impl fmt::Display for VanguardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VanguardError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            VanguardError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            VanguardError::IoError(msg) => write!(f, "IO error: {}", msg),
            VanguardError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            VanguardError::MalformedWeights { line, content } => {
                write!(f, "Malformed weight on line {}: {:?}", line, content)
            }
            VanguardError::EmptyCandidates => write!(f, "No candidate targets to choose from"),
        }
    }
}

impl std::error::Error for VanguardError {}

impl From<std::io::Error> for VanguardError {
    fn from(err: std::io::Error) -> Self {
        VanguardError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for VanguardError {
    fn from(err: bincode::Error) -> Self {
        VanguardError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for VanguardError {
    fn from(err: serde_json::Error) -> Self {
        VanguardError::SerializationError(err.to_string())
    }
}

impl VanguardError {
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        VanguardError::DimensionMismatch { expected, actual }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        VanguardError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
