#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use annotrack_api::config::ServerConfig;
use annotrack_api::router::build_app_router;
use annotrack_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// strict bezier evaluation and a small import limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        lenient_bezier: false,
        max_tracks_per_import: 4,
    }
}

/// Build the application router exactly as `main.rs` does.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// One tracker observation at `frame` with the box's x set to `x`.
pub fn track_frame(frame: u32, x: f64) -> Value {
    json!({
        "frameNumber": frame,
        "box": { "x": x, "y": 10.0, "width": 50.0, "height": 80.0 },
        "confidence": 0.9,
    })
}

/// A tracking result observed at `frames`, with x equal to twice the frame.
pub fn track(track_id: i64, frames: &[u32]) -> Value {
    let frames: Vec<Value> = frames
        .iter()
        .map(|&f| track_frame(f, f64::from(f) * 2.0))
        .collect();
    json!({
        "trackId": track_id,
        "label": "person",
        "confidence": 0.85,
        "model": "samurai",
        "frames": frames,
    })
}

/// A fully visible linear sequence with keyframes at `frames` and x equal to
/// the frame number.
pub fn sequence(frames: &[u32]) -> Value {
    let boxes: Vec<Value> = frames
        .iter()
        .map(|&f| {
            json!({
                "x": f64::from(f),
                "y": 0.0,
                "width": 100.0,
                "height": 100.0,
                "frameNumber": f,
                "isKeyframe": true,
            })
        })
        .collect();
    let segments: Vec<Value> = frames
        .windows(2)
        .map(|w| json!({ "startFrame": w[0], "endFrame": w[1], "type": "linear" }))
        .collect();
    let last = frames.last().copied().unwrap_or(0);
    json!({
        "boxes": boxes,
        "interpolationSegments": segments,
        "visibilityRanges": [{ "startFrame": 0, "endFrame": last, "visible": true }],
        "trackId": 1,
        "trackingSource": "samurai",
        "trackingConfidence": 0.9,
        "totalFrames": last + 1,
        "keyframeCount": frames.len(),
        "interpolatedFrameCount": 0,
    })
}
