//! Read-only HTTP surface over the signal buffer.
//!
//! Every endpoint answers 200 with best-effort content; `/api/status` lets a
//! consumer tell "never populated" apart from "currently empty".

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;

use crate::analyze::IntelligenceSignal;
use crate::buffer::SignalBuffer;

#[derive(Clone)]
pub struct AppState {
    pub buffer: Arc<SignalBuffer>,
}

impl AppState {
    pub fn new(buffer: Arc<SignalBuffer>) -> Self {
        Self { buffer }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(all_news))
        .route("/api/news/latest", get(latest_news))
        .route("/api/status", get(status))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Alias used by the binary and tests.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

async fn all_news(State(state): State<AppState>) -> Json<Vec<IntelligenceSignal>> {
    let snap = state.buffer.all();
    Json(snap.signals.clone())
}

async fn latest_news(State(state): State<AppState>) -> Json<Option<IntelligenceSignal>> {
    Json(state.buffer.latest())
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOut {
    populated: bool,
    count: usize,
    capacity: usize,
    last_updated: Option<DateTime<Utc>>,
}

async fn status(State(state): State<AppState>) -> Json<StatusOut> {
    let snap = state.buffer.snapshot();
    Json(StatusOut {
        populated: snap.is_populated(),
        count: snap.signals.len(),
        capacity: state.buffer.cap(),
        last_updated: snap.updated_at,
    })
}
