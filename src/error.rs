use crate::models::Report;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RonbunError {
    #[error("No input provided - empty document text")]
    NoInput,

    #[error("Provider rate limited the request")]
    RateLimited { retry_after: Option<u64> },

    #[error("Transient provider error: {0}")]
    TransientOther(String),

    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("No usable sections - nothing succeeded, synthesis was not attempted")]
    NoUsableSections { partial: Option<Box<Report>> },

    #[error("Synthesis failed after section analysis completed: {last_error}")]
    SynthesisFailed {
        last_error: String,
        partial: Box<Report>,
    },

    #[error("LLM call timeout after {timeout} seconds")]
    AnalysisTimeout { timeout: u64 },

    #[error("LLM client error: {0}")]
    LlmClientError(String),

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RonbunError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, RonbunError::RateLimited { .. })
    }
}
