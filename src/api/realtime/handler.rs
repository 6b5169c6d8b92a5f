// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::stream::{process_frame, LandmarksMessage, StreamFrame};
use crate::api::http_server::AppState;
use crate::vision::provider::LandmarkProvider;

/// GET /ws/realtime-face
pub async fn realtime_face_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_realtime_socket(socket, state.provider))
}

/// Serve one connection until the peer leaves or the transport fails
pub async fn handle_realtime_socket(mut socket: WebSocket, provider: Arc<dyn LandmarkProvider>) {
    info!("Realtime face client connected");
    let mut frames: u64 = 0;

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Realtime socket error after {} frames: {}", frames, e);
                break;
            }
        };

        let reply = match msg {
            Message::Ping(data) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
                continue;
            }
            Message::Pong(_) => continue,
            Message::Close(_) => {
                info!("Realtime face client sent close");
                break;
            }
            frame => {
                frames += 1;
                detect_frame(provider.clone(), frame).await
            }
        };

        // Undecodable frames get no reply
        let Some(reply) = reply else {
            continue;
        };

        let payload = match serde_json::to_string(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize landmarks reply: {}", e);
                continue;
            }
        };

        if socket.send(Message::Text(payload)).await.is_err() {
            warn!("Realtime client went away mid-reply");
            break;
        }
    }

    info!("Realtime face stream closed after {} frames", frames);
}

async fn detect_frame(
    provider: Arc<dyn LandmarkProvider>,
    frame: Message,
) -> Option<LandmarksMessage> {
    let outcome = tokio::task::spawn_blocking(move || match &frame {
        Message::Text(text) => process_frame(provider.as_ref(), StreamFrame::Text(text)),
        Message::Binary(bytes) => process_frame(provider.as_ref(), StreamFrame::Binary(bytes)),
        _ => None,
    })
    .await;

    match outcome {
        Ok(reply) => reply,
        Err(e) => {
            debug!("Frame worker failed: {}", e);
            Some(LandmarksMessage::empty())
        }
    }
}
