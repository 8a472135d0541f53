use std::fmt;

/// Result type for navdqn operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the navdqn crate
#[derive(Debug, Clone)]
pub enum DqnError {
    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// A loaded parameter blob does not fit the network it is loaded into
    TopologyMismatch {
        expected: String,
        actual: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Failure reported by the environment collaborator
    EnvironmentError(String),
}

impl fmt::Display for DqnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqnError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            DqnError::TopologyMismatch { expected, actual } => {
                write!(f, "Topology mismatch: expected {}, got {}", expected, actual)
            }
            DqnError::IoError(msg) => write!(f, "IO error: {}", msg),
            DqnError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            DqnError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
        }
    }
}

impl std::error::Error for DqnError {}

impl From<std::io::Error> for DqnError {
    fn from(err: std::io::Error) -> Self {
        DqnError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::SerializationError(err.to_string())
    }
}

impl DqnError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
