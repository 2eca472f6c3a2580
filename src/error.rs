use thiserror::Error;

/// Message shown when a submit is attempted with a blank fighter name
pub const MISSING_NAMES_MESSAGE: &str = "Please enter both fighter names";

/// Prediction client errors
///
/// Every variant renders as a single human-readable message, which is what the
/// view surfaces in its failure state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// Input rejected locally, before any request is made
    #[error("{0}")]
    Validation(String),

    /// Transport failure (DNS, connect, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status reported by the service
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Success status with a body that is not the expected shape
    #[error("Invalid response from prediction service: {0}")]
    Decode(String),

    /// Client could not be built from its configuration
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl PredictionError {
    /// Whether resubmitting the same input could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            PredictionError::Validation(_) | PredictionError::InvalidConfig(_)
        )
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictionError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        PredictionError::Network(err.to_string())
    }
}

/// Validation functions
pub fn validate_probability(prob: f64) -> Result<(), PredictionError> {
    if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
        return Err(PredictionError::Validation(format!(
            "Probability must be between 0 and 1, got {}",
            prob
        )));
    }
    Ok(())
}

pub fn validate_fighter_pair(fighter1: &str, fighter2: &str) -> Result<(), PredictionError> {
    if fighter1.trim().is_empty() || fighter2.trim().is_empty() {
        return Err(PredictionError::Validation(MISSING_NAMES_MESSAGE.to_string()));
    }
    Ok(())
}
