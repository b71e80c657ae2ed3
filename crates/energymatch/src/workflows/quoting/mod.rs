pub mod bill;
pub mod catalog;
pub mod delivery;
pub mod gateway;
pub mod gemini;
pub mod recommendation;
pub mod report;
pub mod router;
pub mod service;

pub use bill::{BillAnalysis, BillDocument};
pub use catalog::{Provider, ProviderCatalog, QuoteSource};
pub use delivery::{
    DeliveryError, LeadGateway, LeadOffer, LeadPayload, LeadProject, LeadUser, WebhookDelivery,
    DEFAULT_LEAD_WEBHOOK,
};
pub use gateway::{GatewayError, GenerationRequest, GenerativeGateway, InlineDocument};
pub use gemini::GeminiClient;
pub use recommendation::{Recommendation, Technology, SOLAR_YIELD_KWH_PER_KWP};
pub use report::{ChartEntry, OfferView, QuoteReport};
pub use router::client_router;
pub use service::QuoteService;
