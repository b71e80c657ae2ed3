use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bill::BillDocument;
use super::delivery::{LeadGateway, LeadPayload};
use super::gateway::GenerativeGateway;
use super::recommendation::Recommendation;
use super::report::QuoteReport;
use super::service::QuoteService;
use crate::workflows::coach::{ChatRole, ChatTranscript};
use crate::workflows::intake::profile::EnergyProfile;

/// Router builder exposing the client-facing endpoints.
pub fn client_router<G, D>(service: Arc<QuoteService<G, D>>) -> Router
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/client/bill-analysis",
            post(bill_analysis_handler::<G, D>),
        )
        .route(
            "/api/v1/client/recommendations",
            post(recommendations_handler::<G, D>),
        )
        .route("/api/v1/client/coach", post(coach_handler::<G, D>))
        .route("/api/v1/integrations/lead", post(lead_handler::<G, D>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BillUpload {
    data: String,
    media_type: String,
}

pub(crate) async fn bill_analysis_handler<G, D>(
    State(service): State<Arc<QuoteService<G, D>>>,
    Json(upload): Json<BillUpload>,
) -> Response
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    let bytes = match BASE64.decode(upload.data.as_bytes()) {
        Ok(bytes) => bytes,
        Err(err) => {
            let payload = json!({ "error": format!("document is not valid base64: {err}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let document = match BillDocument::new(bytes, &upload.media_type) {
        Ok(document) => document,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let analysis = service.analyze_bill(document).await;
    (StatusCode::OK, Json(analysis)).into_response()
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    pub(crate) recommendations: Vec<Recommendation>,
    pub(crate) report: QuoteReport,
}

pub(crate) async fn recommendations_handler<G, D>(
    State(service): State<Arc<QuoteService<G, D>>>,
    Json(profile): Json<EnergyProfile>,
) -> Json<QuoteResponse>
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    let offers = service.run_analysis(&profile).await;
    let report = QuoteReport::new(&offers);
    Json(QuoteResponse {
        recommendations: offers,
        report,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoachTurn {
    role: ChatRole,
    text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoachRequest {
    #[serde(default)]
    history: Vec<CoachTurn>,
    message: String,
}

pub(crate) async fn coach_handler<G, D>(
    State(service): State<Arc<QuoteService<G, D>>>,
    Json(request): Json<CoachRequest>,
) -> Json<serde_json::Value>
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    let mut transcript = ChatTranscript::new();
    for turn in request.history {
        transcript.push(turn.role, turn.text);
    }
    let reply = service.coach_reply(&transcript, &request.message).await;
    Json(json!({ "reply": reply }))
}

pub(crate) async fn lead_handler<G, D>(
    State(service): State<Arc<QuoteService<G, D>>>,
    Json(payload): Json<LeadPayload>,
) -> Json<serde_json::Value>
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    service.forward_lead(&payload).await;
    Json(json!({ "status": "sent" }))
}
