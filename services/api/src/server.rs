use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryContactRepository, InMemorySubscriberRepository, InMemoryUserRepository,
};
use crate::routes::with_site_routes;
use agency_site::config::AppConfig;
use agency_site::error::AppError;
use agency_site::records::SiteRecordsService;
use agency_site::reviews::{ChatCompletionClient, ReviewRelay};
use agency_site::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let records_service = Arc::new(SiteRecordsService::new(
        Arc::new(InMemorySubscriberRepository::default()),
        Arc::new(InMemoryContactRepository::default()),
        Arc::new(InMemoryUserRepository::default()),
    ));

    let http = reqwest::Client::builder()
        .timeout(config.review.strategy_timeout)
        .build()?;
    let completion = Arc::new(ChatCompletionClient::new(http, &config.completion)?);
    let relay = Arc::new(ReviewRelay::new(completion, config.completion.api_key.clone()));
    if !relay.is_configured() {
        warn!("OPENAI_API_KEY is not set; review relay will answer 503");
    }

    let app = with_site_routes(records_service, relay)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "agency site backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
