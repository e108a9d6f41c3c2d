//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};

use bookgpt_core::pipeline::ResultSource;
use bookgpt_core::workflows::{MissionVisionInputs, MissionVisionOptions, StakeholderStrategy};

/// Chat reply shown when the request is rejected
pub const CHAT_INVALID_RESPONSE: &str = "Invalid message format";

/// Error text for a chat request without a usable message
pub const CHAT_VALIDATION_ERROR: &str = "Message is required and must be a string";

/// Chat reply shown when the server fails unexpectedly
pub const CHAT_FAILURE_RESPONSE: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again.";

/// Error text for a mission/vision request without `userInputs`
pub const USER_INPUTS_REQUIRED: &str = "User inputs are required";

/// Error text shown to clients for unexpected failures
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Every API response: the endpoint payload plus status fields.
///
/// The payload's fields are flattened into the top-level object, so a chat
/// reply serializes as `{"response": "...", "success": true, "source": "provider"}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<P> {
    #[serde(flatten)]
    pub payload: P,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResultSource>,
}

impl<P> Envelope<P> {
    pub fn success(payload: P, source: ResultSource) -> Self {
        Self {
            payload,
            success: true,
            error: None,
            source: Some(source),
        }
    }

    pub fn failure(payload: P, error: impl Into<String>) -> Self {
        Self {
            payload,
            success: false,
            error: Some(error.into()),
            source: None,
        }
    }
}

/// `{response}` payload of the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub response: String,
}

/// `{strategy}` payload of the stakeholder endpoints; `null` on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPayload {
    pub strategy: Option<StakeholderStrategy>,
}

/// Body of `POST /api/mission-vision`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionVisionRequest {
    #[serde(default)]
    pub user_inputs: Option<MissionVisionInputs>,
}

/// Which endpoint family a failure belongs to, so it renders the right empty payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Chat,
    Options,
    Strategy,
}

impl PayloadKind {
    /// Failure body for a rejected request
    pub fn rejected(self, error: &str) -> serde_json::Value {
        self.body(CHAT_INVALID_RESPONSE, error)
    }

    /// Failure body for an unexpected server error
    pub fn failed(self) -> serde_json::Value {
        self.body(CHAT_FAILURE_RESPONSE, INTERNAL_ERROR)
    }

    fn body(self, chat_response: &str, error: &str) -> serde_json::Value {
        let body = match self {
            Self::Chat => serde_json::to_value(Envelope::failure(
                ChatPayload {
                    response: chat_response.to_string(),
                },
                error,
            )),
            Self::Options => serde_json::to_value(Envelope::failure(
                MissionVisionOptions { options: vec![] },
                error,
            )),
            Self::Strategy => {
                serde_json::to_value(Envelope::failure(StrategyPayload { strategy: None }, error))
            }
        };
        body.unwrap_or_else(|_| serde_json::json!({ "success": false, "error": error }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_flattens_payload() {
        let envelope = Envelope::success(
            ChatPayload {
                response: "hi".into(),
            },
            ResultSource::Fallback,
        );
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({"response": "hi", "success": true, "source": "fallback"})
        );
    }

    #[test]
    fn test_rejected_chat_body() {
        assert_eq!(
            PayloadKind::Chat.rejected(CHAT_VALIDATION_ERROR),
            json!({
                "response": "Invalid message format",
                "success": false,
                "error": "Message is required and must be a string"
            })
        );
    }

    #[test]
    fn test_failed_bodies_have_empty_payload() {
        assert_eq!(PayloadKind::Options.failed()["options"], json!([]));
        assert_eq!(PayloadKind::Strategy.failed()["strategy"], json!(null));
        assert_eq!(PayloadKind::Chat.failed()["response"], json!(CHAT_FAILURE_RESPONSE));
    }

    #[test]
    fn test_mission_vision_request_without_inputs() {
        let request: MissionVisionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.user_inputs.is_none());
    }
}
