//! Upload API integration tests.
//!
//! Run with: `cargo test -p pixinfo-api --test upload_test`

use std::sync::Arc;

use axum_test::TestServer;
use pixinfo_api::setup::routes::setup_routes;
use pixinfo_api::state::AppState;
use pixinfo_core::Config;

const BOUNDARY: &str = "pixinfo-test-boundary";

fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        max_file_size_bytes: 5 * 1024 * 1024,
        allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        http_concurrency_limit: 64,
    }
}

fn setup_test_server() -> TestServer {
    let config = test_config();
    let state = Arc::new(AppState::new(config.clone()));
    let router = setup_routes(&config, state).expect("router setup");
    TestServer::new(router).expect("test server")
}

/// A small uniform gray PNG; carries no EXIF block.
fn png_fixture() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([120, 120, 120, 255]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

fn multipart_body(field_name: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_root_reports_running() {
    let server = setup_test_server();

    let response = server.get("/").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "pixinfo");
}

#[tokio::test]
async fn test_liveness_route() {
    let server = setup_test_server();

    let response = server.get("/health/live").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_upload_png_without_metadata() {
    let server = setup_test_server();
    let png = png_fixture();

    let response = server
        .post("/upload")
        .add_header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .bytes(multipart_body("image", "plain.png", "image/png", &png).into())
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let clean = &body["metadata"]["clean"];

    assert_eq!(clean["FileName"], "plain.png");
    assert_eq!(clean["FileSizeMB"], "0.00");
    assert_eq!(clean["ImageWidth"], 4);
    assert_eq!(clean["ImageHeight"], 4);
    assert_eq!(clean["MIMEType"], "image/png");

    // No EXIF block in a plain PNG: nothing unconsumed, stripped-metadata note
    assert!(body["metadata"]["raw"]
        .as_object()
        .expect("raw object")
        .is_empty());
    assert!(body["metadata"]["note"]
        .as_str()
        .expect("note string")
        .contains("No camera metadata"));

    // Uniform midtone gray: normal brightness, no contrast
    let image = &body["image"];
    assert_eq!(image["width"], 4);
    assert_eq!(image["format"], "Png");
    assert_eq!(image["brightness"], "Normal");
    assert_eq!(image["contrast"], "Low");
}

#[tokio::test]
async fn test_upload_rejects_unknown_extension() {
    let server = setup_test_server();
    let png = png_fixture();

    let response = server
        .post("/upload")
        .add_header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .bytes(multipart_body("image", "evil.exe", "image/png", &png).into())
        .await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_rejects_content_type_extension_mismatch() {
    let server = setup_test_server();
    let png = png_fixture();

    let response = server
        .post("/upload")
        .add_header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .bytes(multipart_body("image", "photo.png", "image/jpeg", &png).into())
        .await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_rejects_missing_image_field() {
    let server = setup_test_server();
    let png = png_fixture();

    let response = server
        .post("/upload")
        .add_header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .bytes(multipart_body("attachment", "plain.png", "image/png", &png).into())
        .await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .expect("error string")
        .contains("image"));
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let server = setup_test_server();

    let response = server
        .post("/upload")
        .add_header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .bytes(multipart_body("image", "empty.png", "image/png", &[]).into())
        .await;
    assert_eq!(response.status_code(), 400);
}
