//! HTTP client for the fight prediction API

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::PredictionError;
use crate::models::{
    ErrorResponse, FighterName, FightersResponse, HealthStatus, PredictionRequest,
    PredictionResult,
};

const CONTEXT_PREDICT: &str = "Failed to get prediction";
const CONTEXT_FIGHTERS: &str = "Failed to fetch fighters";
const CONTEXT_HEALTH: &str = "Health check failed";

/// Request/response boundary to the prediction service
///
/// Only `predict` is mandatory. The roster and health endpoints are optional
/// capabilities; implementations that lack them report an API error.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Ask the service who wins between the two fighters
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError>;

    /// All fighter names the service knows about
    async fn list_fighters(&self) -> Result<Vec<FighterName>, PredictionError> {
        Err(unsupported("fighter listing"))
    }

    /// Best-effort liveness probe
    async fn health_check(&self) -> Result<HealthStatus, PredictionError> {
        Err(unsupported("health check"))
    }
}

fn unsupported(capability: &str) -> PredictionError {
    PredictionError::Api {
        status: StatusCode::NOT_IMPLEMENTED.as_u16(),
        message: format!("This prediction service does not support {}", capability),
    }
}

/// Reply from the service, split on HTTP status before any body inspection
#[derive(Debug)]
enum Reply<T> {
    Success(T),
    Failure {
        status: StatusCode,
        body: ErrorResponse,
    },
}

impl<T: DeserializeOwned> Reply<T> {
    fn decode(status: StatusCode, body: &str) -> Result<Self, PredictionError> {
        if status.is_success() {
            serde_json::from_str(body)
                .map(Reply::Success)
                .map_err(|e| PredictionError::Decode(e.to_string()))
        } else {
            // Error bodies are best effort; anything unreadable falls back to the status line
            let body = serde_json::from_str(body).unwrap_or_default();
            Ok(Reply::Failure { status, body })
        }
    }

    fn into_result(self, context: &str) -> Result<T, PredictionError> {
        match self {
            Reply::Success(value) => Ok(value),
            Reply::Failure { status, body } => {
                let message = body
                    .message()
                    .unwrap_or_else(|| format!("{}: {}", context, status_text(status)));
                Err(PredictionError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Decode a raw `/predict` reply into a validated result
fn decode_prediction(status: StatusCode, body: &str) -> Result<PredictionResult, PredictionError> {
    let result = Reply::<PredictionResult>::decode(status, body)?.into_result(CONTEXT_PREDICT)?;
    result.validate()?;
    Ok(result)
}

/// Validate the configured base URL and strip any trailing slash
fn normalize_base_url(raw: &str) -> Result<String, PredictionError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| PredictionError::InvalidConfig(format!("base URL {:?}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PredictionError::InvalidConfig(format!(
            "base URL must use http or https, got {:?}",
            url.scheme()
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// reqwest-backed prediction client
///
/// Performs exactly one HTTP call per operation: no retries, no caching.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, PredictionError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| PredictionError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send the request and read the whole body
    async fn fetch(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<(StatusCode, String), PredictionError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            PredictionError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned status {}", url, status);
        }

        let body = response.text().await?;
        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T, PredictionError> {
        let url = self.endpoint(path);
        let (status, body) = self.fetch(self.client.get(&url), &url).await?;
        Reply::<T>::decode(status, &body)?.into_result(context)
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let url = self.endpoint("predict");
        info!(
            "Requesting prediction: {} vs {}",
            request.red_fighter, request.blue_fighter
        );

        let (status, body) = self
            .fetch(self.client.post(&url).json(request), &url)
            .await?;
        decode_prediction(status, &body)
    }

    async fn list_fighters(&self) -> Result<Vec<FighterName>, PredictionError> {
        let response: FightersResponse = self.get_json("fighters", CONTEXT_FIGHTERS).await?;
        let total = response.fighters.len();

        let fighters: Vec<FighterName> = response
            .fighters
            .iter()
            .filter_map(|name| FighterName::parse(name).ok())
            .collect();

        if fighters.len() != total {
            warn!("Skipped {} blank fighter names", total - fighters.len());
        }
        info!("Fetched {} fighters", fighters.len());
        Ok(fighters)
    }

    async fn health_check(&self) -> Result<HealthStatus, PredictionError> {
        self.get_json("health", CONTEXT_HEALTH).await
    }
}
