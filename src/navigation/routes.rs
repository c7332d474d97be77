//! REST + WebSocket endpoints for driving navigation from a rendering client.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::controller::Transition;
use super::event::NavEvent;
use super::navigator::{NavSnapshot, Navigator};
use super::view::ScreenView;

/// Shared state for navigation routes.
#[derive(Clone)]
pub struct NavRouteState {
    pub navigator: Arc<Navigator>,
}

/// Message from server → client over `/ws/navigation`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full state, sent on connect and after every change.
    Snapshot { state: NavSnapshot },
    /// The client's event did not change anything.
    Rejected { transition: Transition },
    /// The client's frame could not be parsed.
    Error { message: String },
}

/// Response body of `POST /api/navigation/events`.
#[derive(Debug, Serialize)]
struct EventResponse {
    transition: Transition,
    state: NavSnapshot,
}

/// Build the navigation routes.
pub fn navigation_routes(navigator: Arc<Navigator>) -> Router {
    let state = NavRouteState { navigator };

    Router::new()
        .route("/health", get(health))
        .route("/api/navigation", get(get_state))
        .route("/api/navigation/events", post(post_event))
        .route("/api/navigation/view", get(get_view))
        .route("/ws/navigation", get(ws_handler))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gather"
    }))
}

/// GET /api/navigation
async fn get_state(State(state): State<NavRouteState>) -> impl IntoResponse {
    Json(state.navigator.snapshot().await)
}

/// Message for an event that only its screen action may fire.
fn owned_by_screen(event: &NavEvent, route: &str) -> String {
    format!("{} is fired by POST {route}", event.name())
}

/// POST /api/navigation/events
///
/// Applies one tap event. Ignored events still return 200: an unmatched event
/// is not an error, the state is simply unchanged. Completion events are
/// refused with 409 and the screen action to use instead.
async fn post_event(State(state): State<NavRouteState>, Json(event): Json<NavEvent>) -> Response {
    if let Some(route) = event.screen_action() {
        debug!(event = event.name(), "Refusing raw completion event");
        let body = serde_json::json!({
            "error": owned_by_screen(&event, route),
            "event": event.name(),
            "route": route,
        });
        return (StatusCode::CONFLICT, Json(body)).into_response();
    }
    let transition = state.navigator.dispatch(event).await;
    let snapshot = state.navigator.snapshot().await;
    Json(EventResponse {
        transition,
        state: snapshot,
    })
    .into_response()
}

/// GET /api/navigation/view
async fn get_view(State(state): State<NavRouteState>) -> impl IntoResponse {
    let snapshot = state.navigator.snapshot().await;
    Json(ScreenView::for_snapshot(&snapshot))
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<NavRouteState>) -> impl IntoResponse {
    info!("Navigation client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.navigator))
}

async fn send_json(socket: &mut WebSocket, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize navigation message");
            true
        }
    }
}

async fn handle_socket(mut socket: WebSocket, navigator: Arc<Navigator>) {
    // Subscribe before the initial snapshot so no change slips between them.
    let mut rx = navigator.subscribe();

    let initial = ServerMessage::Snapshot {
        state: navigator.snapshot().await,
    };
    if !send_json(&mut socket, &initial).await {
        warn!("Failed to send initial snapshot, client disconnected");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(state) => {
                        if !send_json(&mut socket, &ServerMessage::Snapshot { state }).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(missed = n, "Navigation client lagged behind broadcast");
                        let state = navigator.snapshot().await;
                        if !send_json(&mut socket, &ServerMessage::Snapshot { state }).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<NavEvent>(&text) {
                            Ok(event) => match event.screen_action() {
                                Some(route) => Some(ServerMessage::Error {
                                    message: owned_by_screen(&event, route),
                                }),
                                None => {
                                    let transition = navigator.dispatch(event).await;
                                    if transition.is_applied() {
                                        None
                                    } else {
                                        Some(ServerMessage::Rejected { transition })
                                    }
                                }
                            },
                            Err(e) => {
                                debug!(error = %e, "Unrecognized navigation frame");
                                Some(ServerMessage::Error { message: e.to_string() })
                            }
                        };
                        if let Some(reply) = reply {
                            if !send_json(&mut socket, &reply).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Navigation client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
}
