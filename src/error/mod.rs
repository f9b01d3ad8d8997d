//! Error handling for the population synthesizer.

use thiserror::Error;

/// Specialized error type for synthesis operations
///
/// Failures are local to a single geography everywhere except
/// [`SynthesisError::Pool`], which aborts the whole run.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// A geography's marginal, joint distribution, or sample table is
    /// missing or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The drawer could not produce the requested number of households
    #[error("Draw failed: {0}")]
    Draw(String),

    /// The worker pool could not be constructed
    #[error("Worker pool error: {0}")]
    Pool(String),
}

impl SynthesisError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a draw error
    pub fn draw(message: impl Into<String>) -> Self {
        Self::Draw(message.into())
    }
}

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthesisError>;
