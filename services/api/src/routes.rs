use crate::infra::AppState;
use agency_site::records::{
    records_router, ContactRepository, SiteRecordsService, SubscriberRepository, UserRepository,
};
use agency_site::reviews::{review_relay_router, ReviewRelay};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_site_routes<S, C, U>(
    records: Arc<SiteRecordsService<S, C, U>>,
    relay: Arc<ReviewRelay>,
) -> axum::Router
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    records_router(records)
        .merge(review_relay_router(relay))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        InMemoryContactRepository, InMemorySubscriberRepository, InMemoryUserRepository,
    };
    use agency_site::config::CompletionConfig;
    use agency_site::reviews::ChatCompletionClient;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn site_app(ready: bool, relay_key: Option<&str>) -> axum::Router {
        let records = Arc::new(SiteRecordsService::new(
            Arc::new(InMemorySubscriberRepository::default()),
            Arc::new(InMemoryContactRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        ));
        let config = CompletionConfig::with_base_url(
            reqwest::Url::parse("http://127.0.0.1:9/v1").expect("valid url"),
        );
        let client = ChatCompletionClient::new(reqwest::Client::new(), &config).expect("client");
        let relay = Arc::new(ReviewRelay::new(
            Arc::new(client),
            relay_key.map(str::to_string),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_site_routes(records, relay).layer(Extension(state))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let app = site_app(false, None);

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "status": "ok" }));

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await, json!({ "status": "initializing" }));

        let response = site_app(true, None)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_exposed_as_prometheus_text() {
        let response = site_app(true, None)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn records_and_relay_are_mounted_together() {
        let app = site_app(true, None);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/subscribers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"Ada@Example.com","name":"Ada"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        assert_eq!(created["email"], "ada@example.com");

        let response = app
            .clone()
            .oneshot(Request::get("/api/users").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!([]));

        let response = app
            .oneshot(
                Request::post("/api/openai/generate-review")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"prompt":"Write about Acme"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
