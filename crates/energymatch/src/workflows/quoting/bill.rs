use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::gateway::{GenerationRequest, GenerativeGateway, InlineDocument};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unrecognized media type '{0}'")]
    MediaType(String),
}

/// A user-supplied bill image or PDF. Held only for the duration of the one
/// outbound extraction request; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDocument {
    data: Vec<u8>,
    media_type: mime::Mime,
}

impl BillDocument {
    pub fn new(data: Vec<u8>, media_type: &str) -> Result<Self, DocumentError> {
        let media_type: mime::Mime = media_type
            .parse()
            .map_err(|_| DocumentError::MediaType(media_type.to_string()))?;
        Ok(Self { data, media_type })
    }

    pub fn media_type(&self) -> &mime::Mime {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Best-effort figures extracted from a bill. The default value doubles as
/// the degrade target: every failure collapses to all-zero, peaks false.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BillAnalysis {
    pub consumption: f64,
    pub cost: f64,
    pub rate: f64,
    pub has_peaks: bool,
}

#[derive(Debug, Deserialize)]
struct BillAnalysisWire {
    consumption: f64,
    cost: f64,
    rate: f64,
    #[serde(rename = "hasPeaks")]
    has_peaks: bool,
}

fn extraction_prompt() -> &'static str {
    "Analyze this energy bill image (likely from Colombia). Extract the following data:\n\
     1. Monthly Consumption in kWh (Consumo).\n\
     2. Total Monthly Cost in COP (Total a Pagar / Costo).\n\
     3. Energy Rate per kWh (Costo Unitario / Tarifa).\n\
     4. Does it show significant peak consumption variations or reactive energy charges? (True/False).\n\
     \n\
     Return ONLY a JSON object with keys: consumption (number), cost (number), rate (number), hasPeaks (boolean).\n\
     If a value is not found, use 0."
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "consumption": { "type": "NUMBER" },
            "cost": { "type": "NUMBER" },
            "rate": { "type": "NUMBER" },
            "hasPeaks": { "type": "BOOLEAN" },
        },
    })
}

/// Run one extraction attempt. Infallible to callers: transport failures,
/// malformed replies, and missing fields all collapse to the zeroed record
/// so the intake flow always has something renderable.
pub async fn analyze<G: GenerativeGateway>(gateway: &G, document: BillDocument) -> BillAnalysis {
    let request = GenerationRequest::text(extraction_prompt())
        .with_document(InlineDocument {
            media_type: document.media_type.to_string(),
            data: document.data,
        })
        .with_schema(response_schema());

    match gateway.generate(request).await {
        Ok(reply) => match serde_json::from_str::<BillAnalysisWire>(&reply) {
            Ok(wire) => BillAnalysis {
                consumption: wire.consumption,
                cost: wire.cost,
                rate: wire.rate,
                has_peaks: wire.has_peaks,
            },
            Err(err) => {
                warn!(%err, "bill reply did not match the expected shape; using zeroed analysis");
                BillAnalysis::default()
            }
        },
        Err(err) => {
            warn!(%err, "bill analysis request failed; using zeroed analysis");
            BillAnalysis::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::quoting::gateway::GatewayError;
    use async_trait::async_trait;

    struct CannedReply(&'static str);

    #[async_trait]
    impl GenerativeGateway for CannedReply {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl GenerativeGateway for Unreachable {
        async fn generate(&self, _request: GenerationRequest) -> Result<String, GatewayError> {
            Err(GatewayError::Transport("connection refused".to_string()))
        }
    }

    fn sample_document() -> BillDocument {
        BillDocument::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg").expect("valid media type")
    }

    #[test]
    fn documents_reject_unparseable_media_types() {
        assert!(BillDocument::new(Vec::new(), "not a mime").is_err());
        let document = sample_document();
        assert_eq!(document.media_type().essence_str(), "image/jpeg");
        assert_eq!(document.len(), 3);
    }

    #[tokio::test]
    async fn well_formed_reply_maps_into_the_analysis() {
        let gateway = CannedReply(
            r#"{"consumption": 3500, "cost": 2000000, "rate": 571.4, "hasPeaks": true}"#,
        );
        let analysis = analyze(&gateway, sample_document()).await;
        assert_eq!(analysis.consumption, 3500.0);
        assert_eq!(analysis.cost, 2_000_000.0);
        assert_eq!(analysis.rate, 571.4);
        assert!(analysis.has_peaks);
    }

    #[tokio::test]
    async fn transport_failure_collapses_to_zeroes() {
        let analysis = analyze(&Unreachable, sample_document()).await;
        assert_eq!(
            analysis,
            BillAnalysis {
                consumption: 0.0,
                cost: 0.0,
                rate: 0.0,
                has_peaks: false,
            }
        );
    }

    #[tokio::test]
    async fn missing_field_collapses_to_zeroes() {
        let gateway = CannedReply(r#"{"consumption": 3500, "cost": 2000000}"#);
        let analysis = analyze(&gateway, sample_document()).await;
        assert_eq!(analysis, BillAnalysis::default());
    }

    #[tokio::test]
    async fn non_json_reply_collapses_to_zeroes() {
        let gateway = CannedReply("I could not read the bill, sorry.");
        let analysis = analyze(&gateway, sample_document()).await;
        assert_eq!(analysis, BillAnalysis::default());
    }
}
