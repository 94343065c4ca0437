pub mod discovery;
pub mod intake;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::db::queries;
use crate::models::context::{self, DialogueContext, DEFAULT_LIFESPAN};
use crate::models::{ContextSet, Expertise, Intent};
use crate::state::AppState;

pub const FALLBACK_TEXT: &str =
    "I didn't understand that. Could you please rephrase or ask about finding a professional?";

/// One inbound webhook turn, reduced to what the handlers need.
pub struct Turn {
    pub intent: Intent,
    /// Normalized caller phone, when the channel supplies one.
    pub caller_phone: Option<String>,
    pub parameters: Map<String, Value>,
    pub contexts: ContextSet,
}

/// What a handler hands back to the webhook controller: the utterance, any
/// contexts to carry into the next turn, and an optional rich payload.
pub struct Reply {
    pub text: String,
    pub contexts: Vec<DialogueContext>,
    pub payload: Option<Value>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            contexts: vec![],
            payload: None,
        }
    }

    pub fn with_context(mut self, ctx: DialogueContext) -> Self {
        self.contexts.push(ctx);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Dispatches a turn to its intent handler. The match is exhaustive over
/// the closed intent set, so a new intent variant that lacks a handler is a
/// compile error rather than a silent fallback.
pub async fn handle_turn(state: &Arc<AppState>, turn: Turn) -> anyhow::Result<Reply> {
    match turn.intent {
        Intent::Welcome => welcome(state, &turn).await,
        Intent::CollectUserInfo => intake::handle(state, &turn).await,
        Intent::GetClinicalProfessional => {
            discovery::suggest(state, &turn, Expertise::ClinicalPsychologist).await
        }
        Intent::GetCounselingProfessional => {
            discovery::suggest(state, &turn, Expertise::CounselingPsychologist).await
        }
        Intent::GetScholarProfessional => {
            discovery::suggest(state, &turn, Expertise::WellnessBuddy).await
        }
        Intent::BookPsychologistSession => discovery::book(state, &turn).await,
        Intent::SuggestAnotherProfessional => discovery::suggest_another(state, &turn).await,
        Intent::Fallback => Ok(Reply::text(FALLBACK_TEXT)),
    }
}

/// Greets returning callers by name; unknown callers are handed straight
/// into the intake flow.
async fn welcome(state: &Arc<AppState>, turn: &Turn) -> anyhow::Result<Reply> {
    if let Some(phone) = &turn.caller_phone {
        let client = {
            let db = state.db.lock().unwrap();
            queries::get_client_by_phone(&db, phone)?
        };

        if let Some(client) = client {
            if let Some(name) = client.name.clone().filter(|n| !n.is_empty()) {
                let mut params = Map::new();
                params.insert("client_id".to_string(), Value::from(client.id));
                params.insert("name".to_string(), Value::from(name.clone()));

                return Ok(Reply::text(format!(
                    "Welcome back, {name}! Would you like me to find you a professional, or book a session?"
                ))
                .with_context(DialogueContext::new(
                    context::KNOWN_USER,
                    DEFAULT_LIFESPAN,
                    params,
                )));
            }
        }
    }

    Ok(Reply::text(
        "Hi, welcome to MindLine! I can match you with a therapist or wellness buddy. \
         First, may I know your name?",
    )
    .with_context(crate::models::IntakeState::AwaitName.into_context()))
}
