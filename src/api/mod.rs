//! HTTP front end.
//!
//! | Method     | Path         | Body                                  |
//! |------------|--------------|---------------------------------------|
//! | POST       | `/hash`      | form `password=...` → id as text      |
//! | GET        | `/hash/{id}` | digest as text, blocks until ready    |
//! | GET        | `/stats`     | `{"Total": n, "Average": ms}`         |
//! | GET, POST  | `/shutdown`  | starts a drain, `202 Accepted`        |

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::coordinator::Coordinator;
use crate::error::HasherError;
use crate::shutdown::ShutdownCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
    pub shutdown: ShutdownCoordinator,
}

#[derive(Deserialize)]
struct SubmitForm {
    password: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/hash", post(submit_handler))
        .route("/hash/{id}", get(retrieve_handler))
        .route("/stats", get(stats_handler))
        .route("/shutdown", get(shutdown_handler).post(shutdown_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for HasherError {
    fn into_response(self) -> Response {
        let status = match &self {
            HasherError::EmptyInput => StatusCode::BAD_REQUEST,
            // Message-only: the lookup is refused but the request itself succeeds.
            HasherError::IdNotPositive(_) => StatusCode::OK,
            HasherError::InvalidIdFormat(_) | HasherError::IdOutOfRange { .. } => {
                StatusCode::NOT_FOUND
            }
            HasherError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            HasherError::Io(_) | HasherError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            HasherError::IdNotPositive(_) => tracing::debug!(error = %self, "Rejected lookup"),
            e if e.is_client_error() => tracing::warn!(error = %e, "Rejected request"),
            e => tracing::error!(error = %e, "Request failed"),
        }

        let body = match &self {
            HasherError::IdNotPositive(_) => "Error - id must be greater than 0".to_string(),
            HasherError::InvalidIdFormat(_) => "invalid id format".to_string(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Response {
    if state.shutdown.is_draining() {
        return HasherError::ShuttingDown.into_response();
    }

    let Form(form) = match form {
        Ok(form) => form,
        // A body that is not urlencoded at all is refused outright instead of
        // being treated as a form without a password field.
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Invalid form");
            return (StatusCode::BAD_REQUEST, "invalid form").into_response();
        }
    };

    let password = form.password.unwrap_or_default();
    match state.coordinator.submit(&password).await {
        Ok(id) => id.to_string().into_response(),
        Err(e) => e.into_response(),
    }
}

async fn retrieve_handler(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    match state.coordinator.lookup(&raw_id).await {
        Ok(digest) => digest.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.coordinator.stats().await.report())
}

async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.shutdown.drain();
    StatusCode::ACCEPTED
}
