use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::{debug, info};

use crate::broker::Message;
use crate::transport::http::AppState;
use crate::transport::message::{ChatParams, EchoParams, EchoResponse, SampleJson};

/// Publishes one chat message and completes immediately.
///
/// A missing or malformed `message` parameter publishes the empty message.
pub(crate) async fn respond_chat(
    State(state): State<AppState>,
    params: Result<Query<ChatParams>, QueryRejection>,
) -> StatusCode {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!("Unreadable chat query, publishing empty message: {rejection}");
            ChatParams::default()
        }
    };
    let message = params.message.unwrap_or_default();

    info!(message = %message, "Chat message received");
    let delivered = state.hub.publish(Message::new(message));
    debug!(delivered, "Chat message fanned out");

    StatusCode::OK
}

pub(crate) async fn respond_echo(
    params: Result<Query<EchoParams>, QueryRejection>,
) -> Json<EchoResponse> {
    let input = params.map(|Query(p)| p.input).unwrap_or_default();
    Json(EchoResponse::from_input(&input))
}

pub(crate) async fn respond_json() -> Json<SampleJson> {
    Json(SampleJson::default())
}

pub(crate) async fn respond_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "Not Found",
    )
}
