use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Reply, Turn};
use crate::models::context::{self, IntakeState};
use crate::models::ClientPatch;
use crate::services::clients::{self, ClientKey};
use crate::services::notify::{campaigns, MediaAttachment};
use crate::state::AppState;

/// Multi-turn profile collection: name, then age, then city. Answers
/// accumulate in the `collect_user_info` context; nothing is persisted
/// until all three are in, at which point the client is upserted by phone
/// and welcomed over WhatsApp.
pub async fn handle(state: &Arc<AppState>, turn: &Turn) -> anyhow::Result<Reply> {
    let step = turn
        .contexts
        .get(context::INTAKE)
        .map(IntakeState::from_context)
        .unwrap_or(IntakeState::AwaitName);

    match step {
        IntakeState::AwaitName => match name_param(&turn.parameters) {
            Some(name) => Ok(Reply::text(format!(
                "Nice to meet you, {name}! How old are you?"
            ))
            .with_context(IntakeState::AwaitAge { name }.into_context())),
            None => Ok(Reply::text("I'd love to get to know you first. What's your name?")
                .with_context(IntakeState::AwaitName.into_context())),
        },

        IntakeState::AwaitAge { name } => match age_param(&turn.parameters) {
            Some(age) => Ok(Reply::text("Thanks! And which city are you in?")
                .with_context(IntakeState::AwaitLocation { name, age }.into_context())),
            None => Ok(Reply::text(format!(
                "Sorry {name}, I didn't catch your age. How old are you?"
            ))
            .with_context(IntakeState::AwaitAge { name }.into_context())),
        },

        IntakeState::AwaitLocation { name, age } => {
            let Some(city) = city_param(&turn.parameters) else {
                return Ok(Reply::text("Which city do you live in?")
                    .with_context(IntakeState::AwaitLocation { name, age }.into_context()));
            };

            // The carried age is only validated here, where it is about to
            // be persisted. A bad value re-asks the age question without
            // losing the name already collected.
            let Some(age) = parse_age(&age) else {
                return Ok(Reply::text(format!(
                    "That doesn't look like a valid age, {name}. How old are you?"
                ))
                .with_context(IntakeState::AwaitAge { name }.into_context()));
            };

            register(state, turn, name, age, city).await
        }
    }
}

/// Terminal step: persist the profile and send the welcome + catalogue
/// notifications. The flow ends here, so no intake context is re-emitted.
async fn register(
    state: &Arc<AppState>,
    turn: &Turn,
    name: String,
    age: i64,
    city: String,
) -> anyhow::Result<Reply> {
    let Some(phone) = turn.caller_phone.as_deref() else {
        // Channels without a caller number give us no identity key to
        // upsert on, and nowhere to deliver the welcome messages.
        tracing::warn!("intake completed without caller phone; profile not persisted");
        return Ok(Reply::text(format!(
            "You're all set, {name}! Ask me to find you a professional whenever you're ready."
        )));
    };

    let client = {
        let db = state.db.lock().unwrap();
        clients::upsert_client(
            &db,
            ClientKey::Phone(phone),
            ClientPatch {
                name: Some(name.clone()),
                age: Some(age),
                city: Some(city),
                ..Default::default()
            },
        )?
    };

    tracing::info!(client_id = client.id, "intake flow completed");

    state
        .notifier
        .send(
            Some(phone),
            campaigns::CLIENT_WELCOME,
            vec![name.clone()],
            None,
        )
        .await
        .best_effort();

    state
        .notifier
        .send(
            Some(phone),
            campaigns::SERVICES_CATALOGUE,
            vec![],
            Some(MediaAttachment {
                url: state.config.catalogue_url.clone(),
                filename: "services-catalogue.pdf".to_string(),
            }),
        )
        .await
        .best_effort();

    Ok(Reply::text(format!(
        "You're all set, {name}! I've sent a welcome message and our services \
         catalogue to your WhatsApp."
    )))
}

// ── Parameter extraction ──
//
// The platform's entity system is loose about shapes: a person entity may
// arrive as a bare string or as {"name": "..."}, and ages as numbers,
// strings, or {"amount": 29, "unit": "year"}.

fn name_param(params: &Map<String, Value>) -> Option<String> {
    let raw = match params.get("person") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(obj)) => obj.get("name").and_then(Value::as_str),
        _ => None,
    }
    .or_else(|| params.get("name").and_then(Value::as_str))?;

    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn age_param(params: &Map<String, Value>) -> Option<String> {
    let raw = match params.get("age")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Object(obj) => match obj.get("amount") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            _ => return None,
        },
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

fn city_param(params: &Map<String, Value>) -> Option<String> {
    let raw = params
        .get("geo-city")
        .and_then(Value::as_str)
        .or_else(|| params.get("city").and_then(Value::as_str))?;

    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A usable age is a whole number in (0, 150].
fn parse_age(raw: &str) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.fract() != 0.0 || value <= 0.0 || value > 150.0 {
        return None;
    }
    Some(value as i64)
}
