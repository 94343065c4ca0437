use std::sync::Arc;

use super::{Reply, Turn};
use crate::models::context::{self, SuggestedProfessional};
use crate::models::Expertise;
use crate::services::matcher;
use crate::services::notify::{campaigns, MediaAttachment};
use crate::state::AppState;

/// Picks a random professional for the category, pushes their profile to
/// the caller's WhatsApp and caches the pick (plus its booking link) in the
/// `selected_professional` context for follow-up intents.
pub async fn suggest(
    state: &Arc<AppState>,
    turn: &Turn,
    expertise: Expertise,
) -> anyhow::Result<Reply> {
    let professional = {
        let db = state.db.lock().unwrap();
        matcher::find_random(&db, expertise)?
    };

    let Some(professional) = professional else {
        // Not an error: the category is just empty right now. No context is
        // emitted, so the conversation stays where it was.
        return Ok(Reply::text(format!(
            "Sorry, no {} is available at the moment. Please try again later.",
            expertise.as_str()
        )));
    };

    let booking_link = format!(
        "{}/{}",
        state.config.booking_base_url.trim_end_matches('/'),
        professional.id
    );

    state
        .notifier
        .send(
            turn.caller_phone.as_deref(),
            campaigns::PROFESSIONAL_PROFILE,
            vec![
                professional.full_name.clone(),
                expertise.as_str().to_string(),
                professional.languages_label(),
            ],
            Some(MediaAttachment {
                url: professional
                    .photo_or(&state.config.default_photo_url)
                    .to_string(),
                filename: "profile.jpg".to_string(),
            }),
        )
        .await
        .best_effort();

    let suggestion = SuggestedProfessional {
        professional_id: professional.id,
        full_name: professional.full_name.clone(),
        area_of_expertise: expertise,
        booking_link,
    };

    Ok(Reply::text(format!(
        "I found a {} for you: {}. I've sent their profile to your WhatsApp. \
         Would you like to book a session?",
        expertise.as_str(),
        professional.full_name
    ))
    .with_context(suggestion.into_context())
    .with_payload(serde_json::json!({ "professional": professional })))
}

/// Sends the cached booking link. Requires a prior suggestion in this
/// conversation; asking to book before one is a precondition failure that
/// gets a nudge, not an error.
pub async fn book(state: &Arc<AppState>, turn: &Turn) -> anyhow::Result<Reply> {
    let suggestion = turn
        .contexts
        .get(context::SELECTED_PROFESSIONAL)
        .and_then(SuggestedProfessional::from_context);

    let Some(suggestion) = suggestion else {
        return Ok(Reply::text(
            "I don't have a professional picked out for you yet. Ask me to find one \
             first and I'll share their booking link.",
        ));
    };

    let delivery = state
        .notifier
        .send(
            turn.caller_phone.as_deref(),
            campaigns::BOOKING_LINK,
            vec![suggestion.full_name.clone(), suggestion.booking_link.clone()],
            None,
        )
        .await;

    // The turn succeeds either way; without a deliverable channel the link
    // goes into the chat reply instead.
    let text = if delivery.is_sent() {
        format!(
            "Done! I've sent the booking link for {} to your WhatsApp.",
            suggestion.full_name
        )
    } else {
        format!(
            "You can book a session with {} here: {}",
            suggestion.full_name, suggestion.booking_link
        )
    };

    Ok(Reply::text(text))
}

/// Re-rolls the suggestion within the same category as the cached pick, or
/// the configured default category when nothing is cached. Repeats of the
/// professional already shown are possible and accepted.
pub async fn suggest_another(state: &Arc<AppState>, turn: &Turn) -> anyhow::Result<Reply> {
    let expertise = turn
        .contexts
        .get(context::SELECTED_PROFESSIONAL)
        .and_then(SuggestedProfessional::from_context)
        .map(|suggestion| suggestion.area_of_expertise)
        .unwrap_or_else(|| {
            Expertise::parse(&state.config.default_expertise).unwrap_or(Expertise::WellnessBuddy)
        });

    suggest(state, turn, expertise).await
}
