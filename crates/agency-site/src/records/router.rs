use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::error::AppError;

use super::domain::{ContactSubmission, SubscriberId, SubscriberSubmission, SubscriberUpdate};
use super::repository::{
    ContactRepository, RepositoryError, SubscriberRepository, UserRepository,
};
use super::service::{RecordsServiceError, SiteRecordsService};

/// Router builder exposing subscriber, contact, and user endpoints.
pub fn records_router<S, C, U>(service: Arc<SiteRecordsService<S, C, U>>) -> Router
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route(
            "/api/subscribers",
            get(list_subscribers_handler::<S, C, U>).post(subscribe_handler::<S, C, U>),
        )
        .route(
            "/api/subscribers/:id",
            put(update_subscriber_handler::<S, C, U>).delete(delete_subscriber_handler::<S, C, U>),
        )
        .route("/api/contact", post(contact_handler::<S, C, U>))
        .route("/api/users", get(list_users_handler::<S, C, U>))
        .with_state(service)
}

fn error_response(err: RecordsServiceError) -> Response {
    let status = match &err {
        RecordsServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        RecordsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecordsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecordsServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "records storage unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match &err {
        RecordsServiceError::Repository(RepositoryError::Conflict) => {
            "a subscriber with this email already exists".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn list_subscribers_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    match service.subscribers() {
        Ok(subscribers) => (StatusCode::OK, Json(subscribers)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn subscribe_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
    payload: Result<Json<SubscriberSubmission>, JsonRejection>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match service.subscribe(submission) {
        Ok(subscriber) => (StatusCode::CREATED, Json(subscriber)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_subscriber_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
    Path(id): Path<u64>,
    payload: Result<Json<SubscriberUpdate>, JsonRejection>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match service.update_subscriber(SubscriberId(id), update) {
        Ok(subscriber) => (StatusCode::OK, Json(subscriber)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_subscriber_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
    Path(id): Path<u64>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    match service.unsubscribe(SubscriberId(id)) {
        Ok(()) => {
            let payload = json!({ "message": "subscriber deleted", "id": id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn contact_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match service.submit_contact(submission) {
        Ok(contact) => (StatusCode::CREATED, Json(contact)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_users_handler<S, C, U>(
    State(service): State<Arc<SiteRecordsService<S, C, U>>>,
) -> Response
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    match service.users() {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => error_response(err),
    }
}
