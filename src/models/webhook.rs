use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::context::DialogueContext;

/// Inbound payload from the conversational platform. Every field is optional
/// at the type level; the webhook controller decides what is fatal.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
    #[serde(default)]
    pub original_detect_intent_request: Option<DetectIntentRequest>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<IntentRef>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub output_contexts: Vec<DialogueContext>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub display_name: String,
}

/// The channel-specific envelope; the caller's phone number lives somewhere
/// inside `payload` depending on the messaging channel.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentRequest {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_contexts: Vec<DialogueContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl WebhookResponse {
    pub fn fallback(text: &str) -> Self {
        Self {
            fulfillment_text: text.to_string(),
            output_contexts: vec![],
            payload: None,
        }
    }
}
