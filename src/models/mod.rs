pub mod client;
pub mod context;
pub mod intent;
pub mod professional;
pub mod webhook;

pub use client::{Client, ClientPatch};
pub use context::{ContextSet, DialogueContext, IntakeState, SuggestedProfessional};
pub use intent::Intent;
pub use professional::{Expertise, NewProfessional, Professional};
pub use webhook::{WebhookRequest, WebhookResponse};
