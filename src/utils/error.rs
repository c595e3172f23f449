// Common error types for freqidx

use crate::models::version::VersionError;
use crate::services::elastic_client::ElasticError;
use crate::services::frequency_reader::FrequencyError;

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Frequency(#[from] FrequencyError),

    #[error(transparent)]
    Elastic(#[from] ElasticError),

    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IndexerError>;

/// Exit code for bad input or configuration
pub const EXIT_INPUT: i32 = 2;
/// Exit code for cluster or network failures
pub const EXIT_CLUSTER: i32 = 3;

/// Error presented to the CLI user, with an optional hint and exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    pub message: String,
    pub suggestion: Option<String>,
    pub exit_code: i32,
}

impl UserError {
    pub fn from_indexer_error(err: &IndexerError) -> Self {
        let (suggestion, exit_code) = match err {
            IndexerError::Config(_) => (
                Some("Check the configuration file or pass --config <path>".to_string()),
                EXIT_INPUT,
            ),
            IndexerError::Validation(_) | IndexerError::Version(_) | IndexerError::Frequency(_) => {
                (None, EXIT_INPUT)
            }
            IndexerError::Elastic(ElasticError::Unauthorized(_)) => (
                Some("Pass valid credentials with --credentials user:password".to_string()),
                EXIT_CLUSTER,
            ),
            IndexerError::Elastic(ElasticError::RequestFailed(_)) => (
                Some("Check that the cluster is reachable at the configured --url".to_string()),
                EXIT_CLUSTER,
            ),
            IndexerError::Elastic(_) => (None, EXIT_CLUSTER),
            IndexerError::Io(_) | IndexerError::Json(_) => (None, 1),
        };

        Self {
            message: err.to_string(),
            suggestion,
            exit_code,
        }
    }

    pub fn print(&self) {
        eprintln!("Error: {}", self.message);
        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{suggestion}");
        }
    }
}
