//! HTTP-level integration tests for the `/api/v1/sequences` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, post_json, sequence};
use serde_json::json;

const DECIMATE: &str = "/api/v1/sequences/decimate";
const EVALUATE: &str = "/api/v1/sequences/evaluate";
const INTERPOLATION: &str = "/api/v1/sequences/interpolation";

fn ease_in_curve() -> serde_json::Value {
    json!([{ "x": 0.42, "y": 0.0 }, { "x": 1.0, "y": 1.0 }])
}

// ---------------------------------------------------------------------------
// POST /sequences/evaluate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn evaluate_interpolates_and_clamps() {
    let app = build_test_app();
    let response = post_json(
        app,
        EVALUATE,
        json!({ "sequence": sequence(&[0, 10]), "frames": [5, 0, 10, 25] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let samples = json["data"].as_array().unwrap();
    assert_eq!(samples.len(), 4);

    assert_eq!(samples[0]["frameNumber"], 5);
    assert_eq!(samples[0]["box"]["x"], 5.0);
    assert_eq!(samples[0]["isKeyframe"], false);
    assert_eq!(samples[0]["visible"], true);

    assert_eq!(samples[1]["isKeyframe"], true);
    assert_eq!(samples[2]["box"]["x"], 10.0);

    // Past the last keyframe the box holds, and the frame is outside the video.
    assert_eq!(samples[3]["box"]["x"], 10.0);
    assert_eq!(samples[3]["visible"], false);
}

#[tokio::test]
async fn evaluate_applies_segment_easing() {
    let mut seq = sequence(&[0, 10]);
    seq["interpolationSegments"][0]["type"] = json!("ease-in");

    let app = build_test_app();
    let response = post_json(app, EVALUATE, json!({ "sequence": seq, "frames": [5] })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["box"]["x"], 2.5);
    // Width and height are equal at both ends, so easing leaves them alone.
    assert_eq!(json["data"][0]["box"]["width"], 100.0);
}

#[tokio::test]
async fn evaluate_hold_keeps_start_box() {
    let mut seq = sequence(&[0, 10]);
    seq["interpolationSegments"][0]["type"] = json!("hold");

    let app = build_test_app();
    let response = post_json(app, EVALUATE, json!({ "sequence": seq, "frames": [9] })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["box"]["x"], 0.0);
}

#[tokio::test]
async fn evaluate_bezier_without_points_fails_in_strict_mode() {
    let mut seq = sequence(&[0, 10]);
    seq["interpolationSegments"][0]["type"] = json!("bezier");

    let app = build_test_app();
    let response = post_json(app, EVALUATE, json!({ "sequence": seq, "frames": [5] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_CONTROL_POINTS");
}

#[tokio::test]
async fn evaluate_bezier_without_points_is_linear_when_lenient() {
    let mut seq = sequence(&[0, 10]);
    seq["interpolationSegments"][0]["type"] = json!("bezier");

    let app = build_test_app();
    let response = post_json(
        app,
        EVALUATE,
        json!({ "sequence": seq, "frames": [5], "lenient": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["box"]["x"], 5.0);
}

#[tokio::test]
async fn evaluate_uses_configured_default_mode() {
    let mut config = common::test_config();
    config.lenient_bezier = true;

    let mut seq = sequence(&[0, 10]);
    seq["interpolationSegments"][0]["type"] = json!("bezier");

    let response = post_json(
        build_test_app_with(config.clone()),
        EVALUATE,
        json!({ "sequence": seq.clone(), "frames": [5] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The request flag overrides the server default.
    let response = post_json(
        build_test_app_with(config),
        EVALUATE,
        json!({ "sequence": seq, "frames": [5], "lenient": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn evaluate_rejects_broken_sequence() {
    let mut seq = sequence(&[0, 5, 10]);
    seq["keyframeCount"] = json!(7);

    let app = build_test_app();
    let response = post_json(app, EVALUATE, json!({ "sequence": seq, "frames": [1] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_SEQUENCE");
}

#[tokio::test]
async fn evaluate_rejects_malformed_sequence_json() {
    let app = build_test_app();
    let response = post_json(
        app,
        EVALUATE,
        json!({ "sequence": { "boxes": "nope" }, "frames": [1] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// POST /sequences/interpolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_interpolation_updates_one_segment() {
    let app = build_test_app();
    let response = post_json(
        app,
        INTERPOLATION,
        json!({
            "sequence": sequence(&[0, 10, 20]),
            "startFrame": 10,
            "interpolation": { "type": "ease-out" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let segments = json["data"]["interpolationSegments"].as_array().unwrap();
    assert_eq!(segments[0]["type"], "linear");
    assert_eq!(segments[1]["type"], "ease-out");
    assert_eq!(segments[1]["startFrame"], 10);
    assert_eq!(segments[1]["endFrame"], 20);
}

#[tokio::test]
async fn set_bezier_interpolation_round_trips_control_points() {
    let curve = ease_in_curve();
    let app = build_test_app();
    let response = post_json(
        app,
        INTERPOLATION,
        json!({
            "sequence": sequence(&[0, 10]),
            "startFrame": 0,
            "interpolation": {
                "type": "bezier",
                "controlPoints": { "x": curve, "y": curve, "width": curve, "height": curve },
            },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let segment = &json["data"]["interpolationSegments"][0];
    assert_eq!(segment["type"], "bezier");
    assert_eq!(segment["controlPoints"]["x"][0]["x"], 0.42);
    assert_eq!(segment["controlPoints"]["height"][1]["y"], 1.0);

    // The updated sequence evaluates in strict mode.
    let response = post_json(
        build_test_app(),
        EVALUATE,
        json!({ "sequence": json["data"].clone(), "frames": [5] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let x = body_json(response).await["data"][0]["box"]["x"]
        .as_f64()
        .unwrap();
    assert!(x > 0.0 && x < 5.0, "ease-in curve should lag linear, got {x}");
}

#[tokio::test]
async fn set_bezier_interpolation_requires_control_points() {
    let app = build_test_app();
    let response = post_json(
        app,
        INTERPOLATION,
        json!({
            "sequence": sequence(&[0, 10]),
            "startFrame": 0,
            "interpolation": { "type": "bezier" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_CONTROL_POINTS");
}

#[tokio::test]
async fn set_interpolation_rejects_unknown_segment() {
    let app = build_test_app();
    let response = post_json(
        app,
        INTERPOLATION,
        json!({
            "sequence": sequence(&[0, 10]),
            "startFrame": 4,
            "interpolation": { "type": "hold" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// POST /sequences/decimate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decimate_with_explicit_stride() {
    let frames: Vec<u32> = (0..=100).collect();
    let app = build_test_app();
    let response = post_json(
        app,
        DECIMATE,
        json!({ "sequence": sequence(&frames), "keepEveryN": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["keyframeCount"], 11);
    assert_eq!(data["interpolatedFrameCount"], 90);
    assert_eq!(data["interpolationSegments"].as_array().unwrap().len(), 10);
    assert_eq!(data["boxes"][10]["frameNumber"], 100);
    assert_eq!(data["totalFrames"], 101);
}

#[tokio::test]
async fn decimate_without_stride_uses_recommended_factor() {
    let frames: Vec<u32> = (0..=100).collect();
    let app = build_test_app();
    let response = post_json(app, DECIMATE, json!({ "sequence": sequence(&frames) })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    // 101 keyframes give a stride of 3: frames 0, 3, ..., 99 plus the last.
    assert_eq!(json["data"]["keyframeCount"], 35);
    assert_eq!(json["data"]["boxes"][34]["frameNumber"], 100);
}

#[tokio::test]
async fn decimate_rejects_zero_stride() {
    let app = build_test_app();
    let response = post_json(
        app,
        DECIMATE,
        json!({ "sequence": sequence(&[0, 1, 2]), "keepEveryN": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn decimate_with_stride_one_reports_interpolated_frames() {
    let app = build_test_app();
    let response = post_json(
        app,
        DECIMATE,
        json!({ "sequence": sequence(&[0, 10]), "keepEveryN": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["keyframeCount"], 2);
    assert_eq!(json["data"]["interpolatedFrameCount"], 9);
}
