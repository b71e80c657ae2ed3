use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::infra::AppState;
use energymatch::workflows::intake::UserRole;
use energymatch::workflows::quoting::{
    catalog::verified_directory, client_router, GenerativeGateway, LeadGateway, QuoteService,
};

pub(crate) fn with_platform_routes<G, D>(service: Arc<QuoteService<G, D>>) -> axum::Router
where
    G: GenerativeGateway + 'static,
    D: LeadGateway + 'static,
{
    client_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/roles", axum::routing::get(roles_endpoint))
        .route(
            "/api/v1/client/providers",
            axum::routing::get(provider_directory_endpoint),
        )
        .route(
            "/api/v1/provider/dashboard",
            axum::routing::get(provider_dashboard_endpoint),
        )
        .route(
            "/api/v1/admin/overview",
            axum::routing::get(admin_overview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// The landing view's role switch; no state beyond the active tag.
pub(crate) async fn roles_endpoint() -> Json<serde_json::Value> {
    let roles: Vec<&'static str> = UserRole::ordered()
        .into_iter()
        .map(UserRole::label)
        .collect();
    Json(json!({ "roles": roles }))
}

pub(crate) async fn provider_directory_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "providers": verified_directory() }))
}

#[derive(Debug, Serialize)]
pub(crate) struct ProviderDashboardResponse {
    pub(crate) leads: u32,
    pub(crate) rating: f32,
    pub(crate) active_projects: u32,
}

/// Static demo stats backing the provider portal landing view.
pub(crate) async fn provider_dashboard_endpoint() -> Json<ProviderDashboardResponse> {
    Json(ProviderDashboardResponse {
        leads: 24,
        rating: 4.8,
        active_projects: 8,
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminOverviewResponse {
    pub(crate) total_users: u32,
    pub(crate) providers: u32,
    pub(crate) co2_saved_tons: f64,
    pub(crate) transacted_volume_cop: u64,
}

/// Static platform-wide stats backing the admin overview.
pub(crate) async fn admin_overview_endpoint() -> Json<AdminOverviewResponse> {
    Json(AdminOverviewResponse {
        total_users: 1240,
        providers: 45,
        co2_saved_tons: 850.5,
        transacted_volume_cop: 2_500_000_000_000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provider_dashboard_reports_demo_stats() {
        let Json(body) = provider_dashboard_endpoint().await;
        assert_eq!(body.leads, 24);
        assert_eq!(body.rating, 4.8);
        assert_eq!(body.active_projects, 8);
    }

    #[tokio::test]
    async fn provider_directory_lists_the_three_known_installers() {
        let Json(body) = provider_directory_endpoint().await;
        let providers = body["providers"].as_array().expect("provider array");
        assert_eq!(providers.len(), 3);
        assert_eq!(providers[0]["name"], "SolarCaribe Pro");
        assert_eq!(providers[2]["verified"], false);
    }

    #[tokio::test]
    async fn roles_listing_offers_the_three_entry_points() {
        let Json(body) = roles_endpoint().await;
        assert_eq!(body["roles"], serde_json::json!(["client", "provider", "admin"]));
    }

    #[tokio::test]
    async fn admin_overview_reports_platform_totals() {
        let Json(body) = admin_overview_endpoint().await;
        assert_eq!(body.total_users, 1240);
        assert_eq!(body.co2_saved_tons, 850.5);
    }
}
