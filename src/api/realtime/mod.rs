// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Realtime landmark streaming over WebSocket
//!
//! GET /ws/realtime-face upgrades the connection; every inbound frame gets
//! at most one `{"landmarks": [...]}` reply, in order.

pub mod handler;

pub use handler::{handle_realtime_socket, realtime_face_handler};
