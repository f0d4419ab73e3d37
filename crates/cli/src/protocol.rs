//! Wire types for the stdin/stdout JSON contract.

use serde::{Deserialize, Serialize};

pub const QUALITY_SYNTHETIC_MODEL: &str = "synthetic-model";
pub const QUALITY_DEGRADED: &str = "degraded";

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub transcript: String,
}

impl ProgressRequest {
    /// Parses and validates the request payload. Malformed JSON, a missing
    /// `transcript` field and a blank transcript are all input errors.
    pub fn parse(raw: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let request: ProgressRequest =
            serde_json::from_str(raw).map_err(|e| format!("invalid request payload: {e}"))?;
        if request.transcript.trim().is_empty() {
            return Err("transcript must not be blank".into());
        }
        Ok(request)
    }
}

/// Exactly one of these is written to stdout per invocation.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProgressResponse {
    Success {
        prediction: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<&'static str>,
    },
    Failure {
        error: String,
    },
}

impl ProgressResponse {
    pub fn success(prediction: f64, quality: Option<&'static str>) -> Self {
        Self::Success {
            prediction,
            quality,
        }
    }

    pub fn failure(error: String) -> Self {
        Self::Failure { error }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"response serialization failed"}"#.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_valid_request() {
        let request = ProgressRequest::parse(r#"{"transcript": "Hello there."}"#).unwrap();
        assert_eq!(request.transcript, "Hello there.");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ProgressRequest::parse("{not json").is_err());
    }

    #[test]
    fn rejects_missing_transcript_field() {
        assert!(ProgressRequest::parse(r#"{"text": "wrong key"}"#).is_err());
    }

    #[test]
    fn rejects_blank_transcript() {
        assert!(ProgressRequest::parse(r#"{"transcript": "   "}"#).is_err());
    }

    #[test]
    fn success_without_quality_is_just_the_prediction() {
        let json = ProgressResponse::success(42.35, None).to_json();
        assert_eq!(json, r#"{"prediction":42.35}"#);
    }

    #[test]
    fn success_with_quality_carries_the_flag() {
        let json = ProgressResponse::success(25.0, Some(QUALITY_DEGRADED)).to_json();
        assert_eq!(json, r#"{"prediction":25.0,"quality":"degraded"}"#);
    }

    #[test]
    fn failure_serializes_the_error_field() {
        let json = ProgressResponse::failure("transcript must not be blank".into()).to_json();
        assert_eq!(json, r#"{"error":"transcript must not be blank"}"#);
    }
}
