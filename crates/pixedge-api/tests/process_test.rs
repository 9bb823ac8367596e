//! Single-operation routes: query parameters become a one-step action list.
//!
//! Run with: `cargo test -p pixedge-api --test process_test`

mod helpers;

use helpers::fixtures::{create_fake_jpeg, create_minimal_png};
use helpers::provider::MockProvider;
use helpers::{process_path, setup_test_app, setup_test_app_with, setup_test_app_with_limit};
use serde_json::json;

#[tokio::test]
async fn test_format_forwards_body_and_action() {
    let app = setup_test_app();
    let png = create_minimal_png();

    let response = app
        .client()
        .post(&process_path("/format"))
        .add_query_param("format", "webp")
        .bytes(png.clone().into())
        .content_type("image/png")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.as_bytes()[..], png.as_slice());

    let request = app.provider.single_request();
    assert_eq!(&request.body[..], png.as_slice());
    assert_eq!(request.content_type.as_deref(), Some("image/png"));
    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "format", "option": {"param": {"f": "webp"}}}])
    );
}

#[tokio::test]
async fn test_format_defaults_to_png() {
    let app = setup_test_app();

    let response = app.client().get(&process_path("/format")).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "format", "option": {"param": {"f": "png"}}}])
    );
}

#[tokio::test]
async fn test_format_rejects_unknown_value() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&process_path("/format"))
        .add_query_param("format", "tiff")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn test_resize_with_all_parameters() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&process_path("/resize"))
        .add_query_param("width", "300")
        .add_query_param("height", "200")
        .add_query_param("quality", "75")
        .bytes(create_fake_jpeg(64).into())
        .content_type("image/jpeg")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "resize", "option": {"mode": "custom", "param": {"p": 75, "fw": 300, "fh": 200}}}])
    );
}

#[tokio::test]
async fn test_resize_defaults_quality_and_omits_dimensions() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&process_path("/resize"))
        .add_query_param("width", "0")
        .add_query_param("height", "tall")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "resize", "option": {"mode": "custom", "param": {"p": 90}}}])
    );
}

#[tokio::test]
async fn test_resize_unparseable_quality_falls_back() {
    let app = setup_test_app();

    app.client()
        .get(&process_path("/resize"))
        .add_query_param("width", "50")
        .add_query_param("quality", "best")
        .await;

    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "resize", "option": {"mode": "custom", "param": {"p": 90, "fw": 50}}}])
    );
}

#[tokio::test]
async fn test_resize_rejects_out_of_range_quality() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&process_path("/resize"))
        .add_query_param("quality", "150")
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn test_rotate_defaults_to_zero() {
    let app = setup_test_app();

    app.client().get(&process_path("/rotate")).await;

    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "rotate", "option": {"mode": "custom", "param": {"a": 0}}}])
    );
}

#[tokio::test]
async fn test_rotate_keeps_fractional_angle() {
    let app = setup_test_app();

    app.client()
        .get(&process_path("/rotate"))
        .add_query_param("angle", "-12.5")
        .await;

    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "rotate", "option": {"mode": "custom", "param": {"a": -12.5}}}])
    );
}

#[tokio::test]
async fn test_watermark_default_text() {
    let app = setup_test_app();

    app.client().get(&process_path("/watermark")).await;

    assert_eq!(
        app.provider.single_actions_json(),
        json!([{"action": "watermark", "option": {"mode": "text", "param": {
            "text": "ImageProcess",
            "fontSize": 16,
            "color": "#ffffff80",
            "dx": 10,
            "dy": 10,
            "rotate": 30
        }}}])
    );
}

#[tokio::test]
async fn test_watermark_custom_text() {
    let app = setup_test_app();

    app.client()
        .get(&process_path("/watermark"))
        .add_query_param("text", "© pixedge")
        .await;

    let actions = app.provider.single_actions_json();
    assert_eq!(actions[0]["option"]["param"]["text"], "© pixedge");
}

#[tokio::test]
async fn test_provider_error_is_relayed() {
    let app = setup_test_app_with(MockProvider::fixed(
        422,
        "application/json",
        b"{\"message\":\"unsupported image\"}",
    ));

    let response = app
        .client()
        .post(&process_path("/resize"))
        .add_query_param("width", "10")
        .bytes(create_fake_jpeg(16).into())
        .content_type("image/jpeg")
        .await;

    assert_eq!(response.status_code(), 422);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.text(), "{\"message\":\"unsupported image\"}");
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let app = setup_test_app_with_limit(1024);

    let response = app
        .client()
        .post(&process_path("/rotate"))
        .add_query_param("angle", "90")
        .bytes(create_fake_jpeg(4096).into())
        .content_type("image/jpeg")
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(app.provider.call_count(), 0);
}
