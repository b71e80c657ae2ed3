use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_platform_routes;
use energymatch::config::AppConfig;
use energymatch::error::AppError;
use energymatch::telemetry;
use energymatch::workflows::quoting::{
    GeminiClient, ProviderCatalog, QuoteService, WebhookDelivery,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(GeminiClient::new(config.gemini.clone())?);
    let delivery = Arc::new(WebhookDelivery::new(&config.lead_webhook)?);
    let quote_service = Arc::new(QuoteService::new(
        gateway,
        delivery,
        ProviderCatalog::standard(),
    ));

    let app = with_platform_routes(quote_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "energy quoting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
