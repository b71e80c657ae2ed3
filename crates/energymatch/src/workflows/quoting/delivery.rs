use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::recommendation::Recommendation;
use crate::config::WebhookConfig;
use crate::workflows::intake::profile::EnergyProfile;

/// Endpoint used when no webhook is configured.
pub const DEFAULT_LEAD_WEBHOOK: &str =
    "https://primary.production.n8n.cloud/webhook/energy-quote";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadUser {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub client_type: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadProject {
    pub consumption: f64,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadOffer {
    pub provider: String,
    pub cost: f64,
    pub capacity: f64,
}

/// Flattened projection of a finished session forwarded to the lead
/// automation webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub user: LeadUser,
    pub project: LeadProject,
    pub offers: Vec<LeadOffer>,
}

impl LeadPayload {
    pub fn new(profile: &EnergyProfile, offers: &[Recommendation]) -> Self {
        Self {
            user: LeadUser {
                name: profile.name.clone(),
                email: profile.email.clone(),
                client_type: profile.client_category.label().to_string(),
                phone: "N/A".to_string(),
            },
            project: LeadProject {
                consumption: profile.monthly_consumption_kwh(),
                location: profile.neighborhood.clone(),
            },
            offers: offers
                .iter()
                .map(|offer| LeadOffer {
                    provider: offer.provider_name.clone(),
                    cost: offer.upfront_cost,
                    capacity: offer.capacity_kw,
                })
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("lead webhook unreachable: {0}")]
    Transport(String),
}

/// Outbound lead hook. Implementations must be fire-and-forget friendly:
/// callers swallow errors and never block the analysis flow on delivery.
#[async_trait]
pub trait LeadGateway: Send + Sync {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError>;
}

/// HTTP implementation posting to the configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    client: Client,
    endpoint: String,
}

impl WebhookDelivery {
    pub fn new(config: &WebhookConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|err| DeliveryError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: config.lead_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadGateway for WebhookDelivery {
    async fn deliver(&self, payload: &LeadPayload) -> Result<(), DeliveryError> {
        // The receiving workflow owns the outcome; status and body are ignored.
        self.client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        Ok(())
    }
}
