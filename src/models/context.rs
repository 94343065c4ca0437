use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::professional::Expertise;

/// Context names used by the dialogue flows. The conversational platform
/// round-trips these between turns; the webhook itself holds no state.
pub const INTAKE: &str = "collect_user_info";
pub const SELECTED_PROFESSIONAL: &str = "selected_professional";
pub const KNOWN_USER: &str = "known_user";

/// Remaining-turns lifespan given to freshly emitted contexts.
pub const DEFAULT_LIFESPAN: u32 = 5;

/// Wire representation of a dialogue context, as carried in
/// `outputContexts` both inbound and outbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueContext {
    pub name: String,
    #[serde(default)]
    pub lifespan_count: u32,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl DialogueContext {
    pub fn new(name: &str, lifespan_count: u32, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.to_string(),
            lifespan_count,
            parameters,
        }
    }

    /// The bare context name. Inbound contexts arrive fully qualified
    /// (`projects/.../sessions/.../contexts/<name>`).
    pub fn short_name(&self) -> &str {
        match self.name.rsplit_once("/contexts/") {
            Some((_, short)) => short,
            None => &self.name,
        }
    }

    /// Qualify the name with the caller's session path before responding.
    pub fn qualify(mut self, session: &str) -> Self {
        if !session.is_empty() && !self.name.contains("/contexts/") {
            self.name = format!("{session}/contexts/{}", self.name);
        }
        self
    }

    fn str_param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

/// Incoming contexts for one turn, looked up by bare name.
#[derive(Debug, Default)]
pub struct ContextSet(Vec<DialogueContext>);

impl ContextSet {
    pub fn new(contexts: Vec<DialogueContext>) -> Self {
        Self(contexts)
    }

    pub fn get(&self, name: &str) -> Option<&DialogueContext> {
        self.0.iter().find(|ctx| ctx.short_name() == name)
    }
}

/// Where the multi-turn intake flow stands. Serialized into the
/// `collect_user_info` context between turns; a handler that keeps the flow
/// going must re-emit it or the accumulated answers are lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    AwaitName,
    AwaitAge { name: String },
    /// `age` is carried as captured; it is validated when the flow completes.
    AwaitLocation { name: String, age: String },
}

impl IntakeState {
    pub fn from_context(ctx: &DialogueContext) -> Self {
        let name = ctx.str_param("name").map(str::to_string);
        let age = ctx.str_param("age").map(str::to_string);

        match (ctx.str_param("step"), name, age) {
            (Some("await_location"), Some(name), Some(age)) => {
                IntakeState::AwaitLocation { name, age }
            }
            (Some("await_age"), Some(name), _) => IntakeState::AwaitAge { name },
            // Unknown or torn parameters restart the flow from the top.
            _ => IntakeState::AwaitName,
        }
    }

    pub fn into_context(self) -> DialogueContext {
        let mut params = Map::new();
        match self {
            IntakeState::AwaitName => {
                params.insert("step".to_string(), Value::from("await_name"));
            }
            IntakeState::AwaitAge { name } => {
                params.insert("step".to_string(), Value::from("await_age"));
                params.insert("name".to_string(), Value::from(name));
            }
            IntakeState::AwaitLocation { name, age } => {
                params.insert("step".to_string(), Value::from("await_location"));
                params.insert("name".to_string(), Value::from(name));
                params.insert("age".to_string(), Value::from(age));
            }
        }
        DialogueContext::new(INTAKE, DEFAULT_LIFESPAN, params)
    }
}

/// The professional cached in the current conversation, with the derived
/// booking link, so follow-up intents don't re-query the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestedProfessional {
    pub professional_id: i64,
    pub full_name: String,
    /// Must equal the tag used to fetch the professional, so that
    /// "suggest another" repeats the same category.
    pub area_of_expertise: Expertise,
    pub booking_link: String,
}

impl SuggestedProfessional {
    pub fn from_context(ctx: &DialogueContext) -> Option<Self> {
        Some(Self {
            professional_id: ctx.parameters.get("professional_id")?.as_i64()?,
            full_name: ctx.str_param("full_name")?.to_string(),
            area_of_expertise: Expertise::parse(ctx.str_param("area_of_expertise")?)?,
            booking_link: ctx.str_param("booking_link")?.to_string(),
        })
    }

    pub fn into_context(self) -> DialogueContext {
        let mut params = Map::new();
        params.insert(
            "professional_id".to_string(),
            Value::from(self.professional_id),
        );
        params.insert("full_name".to_string(), Value::from(self.full_name));
        params.insert(
            "area_of_expertise".to_string(),
            Value::from(self.area_of_expertise.as_str()),
        );
        params.insert("booking_link".to_string(), Value::from(self.booking_link));
        DialogueContext::new(SELECTED_PROFESSIONAL, DEFAULT_LIFESPAN, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_session_prefix() {
        let ctx = DialogueContext::new(
            "projects/p/agent/sessions/s1/contexts/collect_user_info",
            5,
            Map::new(),
        );
        assert_eq!(ctx.short_name(), "collect_user_info");

        let bare = DialogueContext::new("collect_user_info", 5, Map::new());
        assert_eq!(bare.short_name(), "collect_user_info");
    }

    #[test]
    fn test_qualify_prefixes_bare_names_only() {
        let session = "projects/p/agent/sessions/s1";
        let ctx = DialogueContext::new(INTAKE, 5, Map::new()).qualify(session);
        assert_eq!(
            ctx.name,
            "projects/p/agent/sessions/s1/contexts/collect_user_info"
        );

        let already = DialogueContext::new(&ctx.name.clone(), 5, Map::new()).qualify(session);
        assert_eq!(already.name, ctx.name);
    }

    #[test]
    fn test_intake_state_roundtrip() {
        let states = [
            IntakeState::AwaitName,
            IntakeState::AwaitAge {
                name: "Asha".to_string(),
            },
            IntakeState::AwaitLocation {
                name: "Asha".to_string(),
                age: "29".to_string(),
            },
        ];
        for state in states {
            let ctx = state.clone().into_context();
            assert_eq!(ctx.short_name(), INTAKE);
            assert_eq!(IntakeState::from_context(&ctx), state);
        }
    }

    #[test]
    fn test_intake_state_torn_context_restarts() {
        // An await_location context missing its carried age restarts the flow.
        let mut params = Map::new();
        params.insert("step".to_string(), Value::from("await_location"));
        params.insert("name".to_string(), Value::from("Asha"));
        let ctx = DialogueContext::new(INTAKE, 5, params);
        assert_eq!(IntakeState::from_context(&ctx), IntakeState::AwaitName);
    }

    #[test]
    fn test_suggested_professional_roundtrip() {
        let suggestion = SuggestedProfessional {
            professional_id: 42,
            full_name: "Dr. Rao".to_string(),
            area_of_expertise: Expertise::CounselingPsychologist,
            booking_link: "https://app.mindline.in/book/42".to_string(),
        };
        let ctx = suggestion.clone().into_context();
        assert_eq!(ctx.short_name(), SELECTED_PROFESSIONAL);
        assert_eq!(SuggestedProfessional::from_context(&ctx), Some(suggestion));
    }

    #[test]
    fn test_suggested_professional_rejects_incomplete_context() {
        let mut params = Map::new();
        params.insert("full_name".to_string(), Value::from("Dr. Rao"));
        let ctx = DialogueContext::new(SELECTED_PROFESSIONAL, 5, params);
        assert_eq!(SuggestedProfessional::from_context(&ctx), None);
    }
}
