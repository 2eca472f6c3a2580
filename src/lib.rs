//! UFC Predictor - client for the UFC fight prediction API
//!
//! This library provides:
//! - A typed HTTP client for the `/predict`, `/fighters` and `/health` endpoints
//! - A single error type covering validation, transport, API and decode failures
//! - A view controller that drives the idle → loading → result/error cycle
//! - A fighter roster index for name lookup and suggestions
//!
//! # Example
//!
//! ```no_run
//! use ufc_predictor::{ClientConfig, FighterName, PredictionClient, PredictionRequest, PredictionService};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), ufc_predictor::PredictionError> {
//!     let client = PredictionClient::new(ClientConfig::from_env())?;
//!
//!     let request = PredictionRequest::new(
//!         FighterName::parse("Jon Jones")?,
//!         FighterName::parse("Stipe Miocic")?,
//!     );
//!     let result = client.predict(&request).await?;
//!     println!("{} ({:.1}%)", result.winner, result.confidence * 100.0);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod fighters;
pub mod models;

// Re-export commonly used types
pub use client::{PredictionClient, PredictionService};
pub use config::ClientConfig;
pub use controller::{Completion, PredictionViewController, RequestToken, Submission, ViewState};
pub use error::PredictionError;
pub use fighters::{suggest_after_failure, FighterIndex, Suggestion};
pub use models::{
    ErrorResponse, FighterName, FightersResponse, HealthStatus, PredictionRequest,
    PredictionResult,
};
