/// Result alias that carries the custom [`AnalysisError`] type.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A sample block did not contain exactly the number of samples the
    /// analyser was configured for. The caller has to resubmit a correctly
    /// sized block.
    #[error("sample block has {actual} samples, expected exactly {expected}")]
    SampleCountMismatch { expected: usize, actual: usize },
    /// Input that can never be processed, such as a transform buffer whose
    /// length is not a power of two.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// JSON (de)serialisation failed, e.g. for a malformed configuration
    /// document.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl AnalysisError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<&str> for AnalysisError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AnalysisError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
