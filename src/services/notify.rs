use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Campaign (template) names registered with the messaging gateway.
/// Parameters are substituted positionally into each template.
pub mod campaigns {
    pub const CLIENT_WELCOME: &str = "client_welcome";
    pub const SERVICES_CATALOGUE: &str = "services_catalogue";
    pub const PROFESSIONAL_PROFILE: &str = "professional_profile";
    pub const BOOKING_LINK: &str = "session_booking_link";
    pub const PROFESSIONAL_ONBOARDING: &str = "professional_onboarding";
    pub const LOGIN_OTP: &str = "login_otp";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub campaign_name: String,
    pub destination: String,
    pub user_name: String,
    pub template_params: Vec<String>,
    pub media: Option<MediaAttachment>,
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

/// WhatsApp campaign gateway speaking the `{apiKey, campaignName,
/// destination, userName, templateParams, media?}` JSON contract.
pub struct WhatsAppGateway {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WhatsAppGateway {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            url,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationGateway for WhatsAppGateway {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let mut body = serde_json::json!({
            "apiKey": self.api_key,
            "campaignName": message.campaign_name,
            "destination": message.destination,
            "userName": message.user_name,
            "templateParams": message.template_params,
        });
        if let Some(media) = &message.media {
            body["media"] = serde_json::json!({
                "url": media.url,
                "filename": media.filename,
            });
        }

        self.client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("failed to reach messaging gateway")?
            .error_for_status()
            .context("messaging gateway rejected message")?;

        Ok(())
    }
}

/// Outcome of a best-effort send. Failures are already logged where they
/// happen; a turn that must not depend on delivery discards the outcome
/// with [`Delivery::best_effort`], which keeps the ignored path visible.
#[must_use = "acknowledge the delivery outcome (e.g. with .best_effort())"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No destination, or the gateway is not configured.
    Skipped,
    Failed,
}

impl Delivery {
    pub fn is_sent(self) -> bool {
        matches!(self, Delivery::Sent)
    }

    /// Explicitly discard the outcome where the user-visible turn must
    /// complete regardless of delivery.
    pub fn best_effort(self) {}
}

/// Wraps the gateway with the fire-and-forget-but-log policy: nothing in
/// here ever returns an error to a dialogue handler.
pub struct Notifier {
    gateway: Box<dyn NotificationGateway>,
    sender_name: String,
    configured: bool,
}

impl Notifier {
    pub fn new(gateway: Box<dyn NotificationGateway>, sender_name: String, configured: bool) -> Self {
        Self {
            gateway,
            sender_name,
            configured,
        }
    }

    pub async fn send(
        &self,
        destination: Option<&str>,
        campaign_name: &str,
        template_params: Vec<String>,
        media: Option<MediaAttachment>,
    ) -> Delivery {
        let Some(destination) = destination.filter(|d| !d.is_empty()) else {
            tracing::warn!(campaign = campaign_name, "no destination phone, skipping notification");
            return Delivery::Skipped;
        };

        if !self.configured {
            tracing::warn!(
                campaign = campaign_name,
                "messaging gateway not configured, skipping notification"
            );
            return Delivery::Skipped;
        }

        let message = OutboundMessage {
            campaign_name: campaign_name.to_string(),
            destination: destination.to_string(),
            user_name: self.sender_name.clone(),
            template_params,
            media,
        };

        match self.gateway.deliver(&message).await {
            Ok(()) => {
                tracing::debug!(campaign = campaign_name, to = destination, "notification sent");
                Delivery::Sent
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    campaign = campaign_name,
                    to = destination,
                    "notification delivery failed"
                );
                Delivery::Failed
            }
        }
    }
}
