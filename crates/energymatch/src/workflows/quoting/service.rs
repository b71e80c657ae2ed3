use std::sync::Arc;

use tracing::{info, warn};

use super::bill::{self, BillAnalysis, BillDocument};
use super::catalog::ProviderCatalog;
use super::delivery::{LeadGateway, LeadPayload};
use super::gateway::GenerativeGateway;
use super::recommendation::{self, Recommendation};
use crate::workflows::coach::{self, ChatTranscript};
use crate::workflows::intake::profile::EnergyProfile;

/// Front door for everything that leaves the device: bill extraction, quote
/// generation, lead delivery, and the coach chat. Generic over its two seams
/// so tests can substitute in-memory doubles.
pub struct QuoteService<G, D> {
    gateway: Arc<G>,
    leads: Arc<D>,
    catalog: ProviderCatalog,
}

impl<G, D> QuoteService<G, D>
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    pub fn new(gateway: Arc<G>, leads: Arc<D>, catalog: ProviderCatalog) -> Self {
        Self {
            gateway,
            leads,
            catalog,
        }
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// One extraction attempt for an uploaded bill; always renderable.
    pub async fn analyze_bill(&self, document: BillDocument) -> BillAnalysis {
        bill::analyze(self.gateway.as_ref(), document).await
    }

    /// Generate a ranked quote batch for a finished profile, then forward
    /// the lead. Delivery waits for the final offer list so the payload
    /// reflects it, runs only when the profile carries an email, and its
    /// failures never surface past this method.
    pub async fn run_analysis(&self, profile: &EnergyProfile) -> Vec<Recommendation> {
        let offers =
            recommendation::generate(self.gateway.as_ref(), profile, &self.catalog).await;

        if profile.email.is_empty() {
            return offers;
        }

        let payload = LeadPayload::new(profile, &offers);
        match self.leads.deliver(&payload).await {
            Ok(()) => info!(offers = offers.len(), "lead forwarded to delivery webhook"),
            Err(err) => warn!(%err, "lead delivery failed; continuing without it"),
        }

        offers
    }

    /// Forward an externally assembled lead payload, swallowing failures.
    pub async fn forward_lead(&self, payload: &LeadPayload) {
        if let Err(err) = self.leads.deliver(payload).await {
            warn!(%err, "lead forwarding failed");
        }
    }

    /// One coach turn; degrades to the fixed offline reply.
    pub async fn coach_reply(&self, transcript: &ChatTranscript, message: &str) -> String {
        coach::respond(self.gateway.as_ref(), transcript, message).await
    }
}
