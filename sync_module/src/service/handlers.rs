use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tokio::task;
use tracing::{error, info, warn};

use crate::event::{Event, EventError};
use crate::ingest::{EventIngestor, IngestError, IngestResult};

use super::state::AppState;
use super::verify::verify_bearer;

pub(super) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(super) async fn ingest_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Err(reason) = verify_bearer(&headers, state.config.webhook.token.as_deref()) {
        warn!("webhook rejected: {}", reason);
        return (StatusCode::UNAUTHORIZED, Json(json!({"status": reason})));
    }

    let event = match Event::from_json(&body) {
        Ok(event) => event,
        Err(EventError::Json(_)) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"status": "bad_json"})))
        }
        Err(EventError::Invalid(reason)) => {
            warn!("webhook invalid event: {}", reason);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "invalid_event", "error": reason})),
            );
        }
    };
    info!("webhook received {}", event.event_type());

    let result = task::spawn_blocking(move || {
        let ingestor = EventIngestor::new(
            state.board.as_ref(),
            state.source.as_ref(),
            &state.config.board.layout.columns,
            state.config.update_policy,
        );
        ingestor.handle_event(&event, Utc::now())
    })
    .await;

    match result {
        Ok(Ok(IngestResult::Ignored { event_type })) => (
            StatusCode::OK,
            Json(json!({"status": "ignored", "event_type": event_type})),
        ),
        Ok(Ok(IngestResult::Updated { item_id })) => (
            StatusCode::OK,
            Json(json!({"status": "updated", "item": item_id})),
        ),
        Ok(Ok(IngestResult::Created { item_id })) => (
            StatusCode::CREATED,
            Json(json!({"status": "created", "item": item_id})),
        ),
        Ok(Err(IngestError::InvalidEvent(reason))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "invalid_event", "error": reason})),
        ),
        Ok(Err(err)) => {
            error!("webhook ingest failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "error": err.to_string()})),
            )
        }
        Err(err) => {
            error!("webhook ingest task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "error": "ingest task failed"})),
            )
        }
    }
}
