use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{validate_probability, PredictionError};

/// Fighter display name, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FighterName(String);

impl FighterName {
    /// Trim the input and reject empty or whitespace-only names
    pub fn parse(raw: &str) -> Result<Self, PredictionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PredictionError::Validation(
                "Fighter name must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FighterName {
    type Error = PredictionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FighterName> for String {
    fn from(name: FighterName) -> Self {
        name.0
    }
}

impl AsRef<str> for FighterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FighterName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FighterName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for FighterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fight prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub red_fighter: FighterName,
    pub blue_fighter: FighterName,
}

impl PredictionRequest {
    pub fn new(red_fighter: FighterName, blue_fighter: FighterName) -> Self {
        Self {
            red_fighter,
            blue_fighter,
        }
    }
}

/// Fight prediction returned by the service
///
/// The two win probabilities are not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub winner: FighterName,
    pub red_fighter: FighterName,
    pub blue_fighter: FighterName,
    pub red_win_probability: f64,
    pub blue_win_probability: f64,
    pub confidence: f64,
}

impl PredictionResult {
    /// Check that every probability lies in [0, 1]
    pub fn validate(&self) -> Result<(), PredictionError> {
        for (field, value) in [
            ("red_win_probability", self.red_win_probability),
            ("blue_win_probability", self.blue_win_probability),
            ("confidence", self.confidence),
        ] {
            validate_probability(value).map_err(|e| {
                PredictionError::Decode(format!("{}: {}", field, e))
            })?;
        }
        Ok(())
    }
}

/// Fighter roster response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FightersResponse {
    #[serde(default)]
    pub fighters: Vec<String>,
}

/// Health probe response, kept opaque
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus {
    pub body: serde_json::Value,
}

/// Error body sent by the service on non-2xx replies
///
/// `detail` is a plain string for application errors and a list of
/// `{loc, msg, type}` objects for request validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Human-readable message carried by the body, if any
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fighter_name_trims() {
        let name = FighterName::parse("  Jon Jones \n").unwrap();
        assert_eq!(name.as_str(), "Jon Jones");
    }

    #[test]
    fn test_fighter_name_rejects_blank() {
        assert!(FighterName::parse("").is_err());
        assert!(FighterName::parse("   \t").is_err());
    }

    #[test]
    fn test_request_wire_format() {
        let req = PredictionRequest::new(
            FighterName::parse("Jon Jones").unwrap(),
            FighterName::parse("Stipe Miocic").unwrap(),
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"red_fighter": "Jon Jones", "blue_fighter": "Stipe Miocic"})
        );
    }

    #[test]
    fn test_request_rejects_blank_name_on_deserialize() {
        let result: Result<PredictionRequest, _> =
            serde_json::from_value(json!({"red_fighter": " ", "blue_fighter": "B"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_deserialize() {
        let result: PredictionResult = serde_json::from_value(json!({
            "winner": "A",
            "red_fighter": "A",
            "blue_fighter": "B",
            "red_win_probability": 0.7,
            "blue_win_probability": 0.3,
            "confidence": 0.7
        }))
        .unwrap();
        assert_eq!(result.winner, "A");
        assert_eq!(result.confidence, 0.7);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_result_rejects_blank_names() {
        let result: Result<PredictionResult, _> = serde_json::from_value(json!({
            "winner": "  ",
            "red_fighter": "A",
            "blue_fighter": "B",
            "red_win_probability": 0.7,
            "blue_win_probability": 0.3,
            "confidence": 0.7
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_validate_out_of_range() {
        let result = PredictionResult {
            winner: FighterName::parse("A").unwrap(),
            red_fighter: FighterName::parse("A").unwrap(),
            blue_fighter: FighterName::parse("B").unwrap(),
            red_win_probability: 1.2,
            blue_win_probability: 0.3,
            confidence: 0.7,
        };
        let err = result.validate().unwrap_err();
        assert!(matches!(err, PredictionError::Decode(_)));
        assert!(err.to_string().contains("red_win_probability"));
    }

    #[test]
    fn test_fighters_response_missing_field() {
        let resp: FightersResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.fighters.is_empty());
    }

    #[test]
    fn test_error_response_string_detail() {
        let resp: ErrorResponse =
            serde_json::from_value(json!({"detail": "model unavailable"})).unwrap();
        assert_eq!(resp.message().as_deref(), Some("model unavailable"));
    }

    #[test]
    fn test_error_response_validation_detail() {
        let resp: ErrorResponse = serde_json::from_value(json!({
            "detail": [
                {"loc": ["body", "red_fighter"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["body", "blue_fighter"], "msg": "field required", "type": "value_error.missing"}
            ]
        }))
        .unwrap();
        assert_eq!(
            resp.message().as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn test_error_response_without_message() {
        let blank: ErrorResponse = serde_json::from_value(json!({"detail": "  "})).unwrap();
        assert!(blank.message().is_none());

        let numeric: ErrorResponse = serde_json::from_value(json!({"detail": 42})).unwrap();
        assert!(numeric.message().is_none());

        let missing: ErrorResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.message().is_none());
    }
}
