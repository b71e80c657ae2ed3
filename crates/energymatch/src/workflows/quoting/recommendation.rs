use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::catalog::ProviderCatalog;
use super::gateway::{GenerationRequest, GenerativeGateway};
use crate::workflows::intake::profile::EnergyProfile;

/// Assumed solar yield for Cartagena: kWh generated per month per installed
/// kWp. Embedded verbatim in every quote prompt.
pub const SOLAR_YIELD_KWH_PER_KWP: f64 = 130.0;

pub const FALLBACK_OFFER_ID: &str = "rec_1";

const FALLBACK_HASH: &str = "0x7f83b1657ff1fc53b92dc18148a1d65dfc2d4b1fa3d677284addd200126d9069";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "Solar PV", alias = "Solar FV")]
    SolarPv,
    #[serde(rename = "Eólica", alias = "Wind")]
    Wind,
    #[serde(rename = "Híbrida", alias = "Hybrid")]
    Hybrid,
}

impl Technology {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SolarPv => "Solar PV",
            Self::Wind => "Eólica",
            Self::Hybrid => "Híbrida",
        }
    }
}

/// One ranked provider offer. Batches are produced atomically per analysis
/// call, replace any prior batch, and are never mutated field by field.
///
/// The wire shape is the external service's camelCase contract; the serde
/// attributes double as the boundary validation, so a record missing any
/// required key fails the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub provider_name: String,
    pub technology: Technology,
    #[serde(rename = "capacityKW")]
    pub capacity_kw: f64,
    #[serde(rename = "pricePerKW")]
    pub price_per_kw: f64,
    pub estimated_generation_monthly: f64,
    pub roi_years: f64,
    pub upfront_cost: f64,
    #[serde(default)]
    pub savings_monthly: f64,
    #[serde(default)]
    pub co2_offset: f64,
    #[serde(default)]
    pub confidence_score: f64,
    pub hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OfferParseError {
    #[error("offer payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("offer batch was empty")]
    EmptyBatch,
    #[error("offer '{id}' has non-positive capacity")]
    InvalidCapacity { id: String },
}

/// Validate a raw reply into an ordered batch. Ordering is the service's
/// best-value ranking and is preserved as-is; this layer never re-sorts.
pub(crate) fn parse_batch(reply: &str) -> Result<Vec<Recommendation>, OfferParseError> {
    let offers: Vec<Recommendation> = serde_json::from_str(reply)?;
    if offers.is_empty() {
        return Err(OfferParseError::EmptyBatch);
    }
    for offer in &offers {
        if !(offer.capacity_kw > 0.0) {
            return Err(OfferParseError::InvalidCapacity {
                id: offer.id.clone(),
            });
        }
    }
    Ok(offers)
}

/// The canned offer served when the external service cannot produce a
/// batch. Fixed demo values; callers must never see an empty result.
pub fn fallback_offer() -> Recommendation {
    Recommendation {
        id: FALLBACK_OFFER_ID.to_string(),
        provider_name: "SolarCaribe Pro".to_string(),
        technology: Technology::SolarPv,
        capacity_kw: 5.0,
        price_per_kw: 4_200_000.0,
        estimated_generation_monthly: 650.0,
        roi_years: 3.5,
        upfront_cost: 21_000_000.0,
        savings_monthly: 600_000.0,
        co2_offset: 2.1,
        confidence_score: 95.0,
        hash: FALLBACK_HASH.to_string(),
    }
}

pub(crate) fn quote_prompt(profile: &EnergyProfile, catalog: &ProviderCatalog) -> String {
    let mut prompt = String::new();
    writeln!(prompt, "Act as an Energy Engineering Engine.").expect("write prompt");
    writeln!(
        prompt,
        "Calculate the required Solar PV system size (Capacity in KW) for a client in Cartagena based on:"
    )
    .expect("write prompt");
    writeln!(
        prompt,
        "- Monthly Consumption: {} kWh",
        profile.monthly_consumption_kwh()
    )
    .expect("write prompt");
    writeln!(
        prompt,
        "- Assumed Solar Yield Cartagena: {SOLAR_YIELD_KWH_PER_KWP} kWh/month per 1 kWp installed."
    )
    .expect("write prompt");
    prompt.push('\n');
    writeln!(
        prompt,
        "Then, map this system size to the 3 Available Providers below to create specific quotes."
    )
    .expect("write prompt");
    prompt.push_str(&catalog.prompt_block());
    prompt.push('\n');
    writeln!(
        prompt,
        "Rank the results by \"Best Value\" (mix of price and quality/confidence)."
    )
    .expect("write prompt");
    prompt.push('\n');
    writeln!(prompt, "Return a JSON array of 3 objects.").expect("write prompt");
    prompt
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "providerName": { "type": "STRING" },
                "technology": { "type": "STRING" },
                "capacityKW": { "type": "NUMBER" },
                "pricePerKW": { "type": "NUMBER" },
                "estimatedGenerationMonthly": { "type": "NUMBER" },
                "roiYears": { "type": "NUMBER" },
                "upfrontCost": { "type": "NUMBER" },
                "savingsMonthly": { "type": "NUMBER" },
                "co2Offset": { "type": "NUMBER" },
                "confidenceScore": { "type": "NUMBER" },
                "hash": { "type": "STRING" },
            },
            "required": [
                "id",
                "providerName",
                "technology",
                "capacityKW",
                "pricePerKW",
                "estimatedGenerationMonthly",
                "roiYears",
                "upfrontCost",
                "hash",
            ],
        },
    })
}

/// Request one ranked quote batch for a finished profile. Any transport or
/// parse failure degrades to the single fallback offer; the substitution is
/// visible in logs only.
pub async fn generate<G: GenerativeGateway>(
    gateway: &G,
    profile: &EnergyProfile,
    catalog: &ProviderCatalog,
) -> Vec<Recommendation> {
    let request =
        GenerationRequest::text(quote_prompt(profile, catalog)).with_schema(response_schema());

    match gateway.generate(request).await {
        Ok(reply) => match parse_batch(&reply) {
            Ok(offers) => offers,
            Err(err) => {
                warn!(%err, "offer batch rejected; serving the fallback quote");
                vec![fallback_offer()]
            }
        },
        Err(err) => {
            warn!(%err, "quote generation failed; serving the fallback quote");
            vec![fallback_offer()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::quoting::gateway::GatewayError;
    use async_trait::async_trait;

    struct CannedReply(String);

    #[async_trait]
    impl GenerativeGateway for CannedReply {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl GenerativeGateway for Unreachable {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
            Err(GatewayError::Transport("dns failure".to_string()))
        }
    }

    fn offer_json(id: &str, provider: &str, capacity: f64) -> serde_json::Value {
        json!({
            "id": id,
            "providerName": provider,
            "technology": "Solar PV",
            "capacityKW": capacity,
            "pricePerKW": 4200000,
            "estimatedGenerationMonthly": capacity * SOLAR_YIELD_KWH_PER_KWP,
            "roiYears": 4.1,
            "upfrontCost": capacity * 4200000.0,
            "savingsMonthly": 580000,
            "co2Offset": 1.8,
            "confidenceScore": 90,
            "hash": "0xabc123"
        })
    }

    #[test]
    fn batches_parse_in_service_order() {
        let reply = json!([
            offer_json("rec_1", "Ingeniería Sostenible SAS", 5.2),
            offer_json("rec_2", "SolarCaribe Pro", 5.2),
            offer_json("rec_3", "EcoEnergy Cartagena", 5.2),
        ])
        .to_string();

        let offers = parse_batch(&reply).expect("batch parses");
        assert_eq!(offers.len(), 3);
        // Upstream ordering is trusted as-is, not re-sorted by price.
        assert_eq!(offers[0].provider_name, "Ingeniería Sostenible SAS");
        assert_eq!(offers[0].technology, Technology::SolarPv);
    }

    #[test]
    fn missing_required_key_fails_the_batch() {
        let mut offer = offer_json("rec_1", "SolarCaribe Pro", 5.0);
        offer.as_object_mut().expect("object").remove("hash");
        let reply = json!([offer]).to_string();
        assert!(matches!(
            parse_batch(&reply),
            Err(OfferParseError::Json(_))
        ));
    }

    #[test]
    fn zero_capacity_fails_the_batch() {
        let reply = json!([offer_json("rec_1", "SolarCaribe Pro", 0.0)]).to_string();
        assert!(matches!(
            parse_batch(&reply),
            Err(OfferParseError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(parse_batch("[]"), Err(OfferParseError::EmptyBatch)));
    }

    #[test]
    fn prompt_embeds_consumption_yield_and_catalog() {
        let mut profile = EnergyProfile::default();
        profile.set_monthly_consumption_kwh(3500.0);
        let prompt = quote_prompt(&profile, &ProviderCatalog::standard());

        assert!(prompt.contains("Monthly Consumption: 3500 kWh"));
        assert!(prompt.contains("130 kWh/month per 1 kWp installed"));
        assert!(prompt.contains("SolarCaribe Pro"));
        assert!(prompt.contains("EcoEnergy Cartagena"));
        assert!(prompt.contains("Ingeniería Sostenible SAS"));
        assert!(prompt.contains("Best Value"));
    }

    #[tokio::test]
    async fn transport_failure_serves_the_fixed_fallback() {
        let profile = EnergyProfile::default();
        let offers = generate(&Unreachable, &profile, &ProviderCatalog::standard()).await;

        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.id, "rec_1");
        assert_eq!(offer.provider_name, "SolarCaribe Pro");
        assert_eq!(offer.capacity_kw, 5.0);
        assert_eq!(offer.upfront_cost, 21_000_000.0);
        assert_eq!(offer.roi_years, 3.5);
        assert_eq!(offer.hash, FALLBACK_HASH);
    }

    #[tokio::test]
    async fn malformed_reply_serves_the_fixed_fallback() {
        let profile = EnergyProfile::default();
        let gateway = CannedReply("not json at all".to_string());
        let offers = generate(&gateway, &profile, &ProviderCatalog::standard()).await;
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, FALLBACK_OFFER_ID);
    }

    #[test]
    fn wire_deserialization_accepts_backend_technology_alias() {
        let offer: Recommendation = serde_json::from_value(json!({
            "id": "rec-1",
            "providerName": "SolarCaribe Pro",
            "technology": "Solar FV",
            "capacityKW": 29.2,
            "pricePerKW": 4200000,
            "estimatedGenerationMonthly": 3796,
            "roiYears": 4.2,
            "upfrontCost": 122640000,
            "hash": "0xdeadbeef"
        }))
        .expect("alias parses");
        assert_eq!(offer.technology, Technology::SolarPv);
        assert_eq!(offer.savings_monthly, 0.0);
    }
}
