// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! WebSocket /ws/realtime-face against a live listener

use futures_util::{SinkExt, StreamExt};
use phi_ratio_analyzer::api::{create_router, AppState};
use phi_ratio_analyzer::{DetectionError, LandmarkProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::common::{png_bytes, png_data_url, sample_face, ScriptedProvider};

async fn spawn_server(provider: Arc<dyn LandmarkProvider>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(provider), &["*".to_string()]);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn next_text<S>(ws: &mut S) -> serde_json::Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for reply")
            .expect("stream ended")
            .expect("transport error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[cfg(test)]
mod realtime_stream_tests {
    use super::*;

    /// Test 1: bad frame skipped, failed frame empty, good frame served
    #[tokio::test]
    async fn test_stream_survives_bad_frames() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(DetectionError::NoFace),
            Ok(sample_face()),
        ]));
        let addr = spawn_server(provider).await;
        let (mut ws, _) = connect_async(format!("ws://{}/ws/realtime-face", addr))
            .await
            .unwrap();

        ws.send(Message::Text("garbage".to_string())).await.unwrap();
        ws.send(Message::Text(png_data_url(32, 32))).await.unwrap();
        ws.send(Message::Text(png_data_url(32, 32))).await.unwrap();

        let first = next_text(&mut ws).await;
        assert_eq!(first, serde_json::json!({ "landmarks": [] }));

        let second = next_text(&mut ws).await;
        let landmarks = second["landmarks"].as_array().unwrap();
        assert_eq!(landmarks.len(), 68);
        let p0 = sample_face()[0];
        assert_eq!(landmarks[0], serde_json::json!([p0.x, p0.y]));

        ws.close(None).await.unwrap();
    }

    /// Test 2: binary frames are raw image bytes
    #[tokio::test]
    async fn test_binary_frame() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(sample_face())]));
        let addr = spawn_server(provider).await;
        let (mut ws, _) = connect_async(format!("ws://{}/ws/realtime-face", addr))
            .await
            .unwrap();

        ws.send(Message::Binary(png_bytes(16, 16))).await.unwrap();
        let reply = next_text(&mut ws).await;
        assert_eq!(reply["landmarks"].as_array().unwrap().len(), 68);
    }

    /// Test 3: ping is answered with pong
    #[tokio::test]
    async fn test_ping_pong() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let addr = spawn_server(provider).await;
        let (mut ws, _) = connect_async(format!("ws://{}/ws/realtime-face", addr))
            .await
            .unwrap();

        ws.send(Message::Ping(b"beat".to_vec())).await.unwrap();
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(msg, Message::Pong(b"beat".to_vec()));
    }
}
