//! Steward webhook receiver.
//!
//! Exposes the HTTP surface GitHub delivers webhooks to and hands each
//! delivery to a [`reaction::Dispatcher`]:
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET /` | liveness answer |
//! | `POST /webhook` | dispatch; `200` for `ok`, `500` for `error` |
//! | `GET /webhook` | `405` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Header extraction, body parsing and status codes live
//! here. The [`reaction`] crate sees only an event name and a JSON payload.
//! Request signatures are not verified; deployments that need it put a
//! verifying proxy in front.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use reaction::{DispatchResult, DispatchStatus, Dispatcher};

/// Header carrying the webhook event name.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the unique delivery id.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Body of the non-dispatch routes.
#[derive(Debug, Serialize)]
struct StatusMessage {
    data: &'static str,
    status: DispatchStatus,
}

/// Builds the webhook router around a shared dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/webhook", get(reject_get).post(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

/// Binds `addr` and serves the router until the process stops.
///
/// # Errors
///
/// Returns the I/O error if the socket cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "webhook listener started");
    axum::serve(listener, router(dispatcher)).await
}

async fn hello() -> Json<StatusMessage> {
    Json(StatusMessage {
        data: "hello world!",
        status: DispatchStatus::Ok,
    })
}

async fn reject_get() -> (StatusCode, Json<StatusMessage>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(StatusMessage {
            data: "you shall not pass",
            status: DispatchStatus::Error,
        }),
    )
}

async fn receive_webhook(
    State(dispatcher): State<Arc<Dispatcher>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<DispatchResult>) {
    let event = header_value(&headers, EVENT_HEADER).unwrap_or_default();
    let delivery = header_value(&headers, DELIVERY_HEADER)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!("delivery", event, delivery = %delivery);
    async move {
        let payload = parse_payload(&body);
        let result = dispatcher.dispatch(event, payload).await;
        let status = if result.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        info!(status = status.as_u16(), "delivery processed");
        (status, Json(result))
    }
    .instrument(span)
    .await
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Parses the body as JSON; anything unparseable becomes an empty object.
fn parse_payload(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|error| {
        warn!(%error, "webhook body is not JSON; dispatching an empty payload");
        Value::Object(Map::new())
    })
}
