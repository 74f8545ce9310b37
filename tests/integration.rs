use cabinet_scan::ai::{MockDiscovery, MockTransport, Outcome, VisionClient};
use cabinet_scan::config::{Config, Credential, ModelConfig, RetryPolicy, TransportKind};
use cabinet_scan::interpret::{EMPTY_RESPONSE_MESSAGE, RATE_LIMITED_MESSAGE};
use cabinet_scan::CabinetScanner;
use image::{DynamicImage, ImageFormat};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-1.5-flash-001";
const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash-001:generateContent";

fn config_for(server: &MockServer, raw_key: &str) -> Config {
    Config::new(
        Credential::new(raw_key).unwrap(),
        ModelConfig::new(&server.uri(), "v1beta", MODEL),
    )
}

fn cabinet_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(64, 48, image::Rgba([30, 30, 40, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn cabinet_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 48, image::Rgb([30, 30, 40]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn candidates(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

#[tokio::test]
async fn test_png_and_jpeg_photos_yield_model_text_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "secret123"))
        .respond_with(candidates("03, 08, 12"))
        .expect(2)
        .mount(&server)
        .await;

    let scanner = CabinetScanner::from_config(&config_for(&server, " secret123 \n")).unwrap();

    for photo in [cabinet_png(), cabinet_jpeg()] {
        let report = scanner.scan_bytes(&photo).await;
        assert!(report.is_success());
        assert_eq!(report.message, "03, 08, 12");
    }

    let requests = server.received_requests().await.unwrap();
    for request in requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("48"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert!(!parts[1]["inline_data"]["data"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_not_found_triggers_single_discovery_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("models/x is not found"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                { "name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"] },
                { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, "secret123");
    config.retry = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(2),
    };
    let scanner = CabinetScanner::from_config(&config).unwrap();

    let report = scanner.scan_bytes(&cabinet_png()).await;
    assert_eq!(report.outcome, Some(Outcome::ModelNotFound));
    assert!(report.message.contains(MODEL));
    assert!(report.message.contains("- gemini-2.5-flash"));
    assert!(!report.message.contains("embedding-001"));
}

#[tokio::test]
async fn test_rate_limit_message_differs_from_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .mount(&server)
        .await;

    let scanner = CabinetScanner::from_config(&config_for(&server, "k")).unwrap();
    let report = scanner.scan_bytes(&cabinet_png()).await;

    assert_eq!(report.outcome, Some(Outcome::RateLimited));
    assert_eq!(report.message, RATE_LIMITED_MESSAGE);
    assert!(!report.message.contains("HTTP status"));
}

#[tokio::test]
async fn test_retry_recovers_from_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(candidates("NONE"))
        .mount(&server)
        .await;

    let mut config = config_for(&server, "k");
    config.retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(2),
    };
    let scanner = CabinetScanner::from_config(&config).unwrap();

    let report = scanner.scan_bytes(&cabinet_jpeg()).await;
    assert_eq!(report.message, "NONE");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_candidates_is_reported_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let scanner = CabinetScanner::from_config(&config_for(&server, "k")).unwrap();
    let report = scanner.scan_bytes(&cabinet_png()).await;

    assert_eq!(report.outcome, Some(Outcome::EmptyOrUnparsable));
    assert_eq!(report.message, EMPTY_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_openai_compatible_transport_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/openai/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "11, 40" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, "k");
    config.transport = TransportKind::OpenAiCompat;
    let scanner = CabinetScanner::from_config(&config).unwrap();

    let report = scanner.scan_bytes(&cabinet_png()).await;
    assert_eq!(report.message, "11, 40");
}

#[tokio::test]
async fn test_scanner_with_injected_mocks() {
    let transport = Arc::new(MockTransport::new().with_outcome(Outcome::ClientException(
        "could not connect".to_string(),
    )));
    let discovery = Arc::new(MockDiscovery::new());
    let scanner = CabinetScanner::new(
        VisionClient::new(Box::new(transport.clone())),
        Box::new(discovery.clone()),
    );

    let photo = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
    let report = scanner.scan(&photo).await;

    assert!(report.message.contains("could not connect"));
    assert_eq!(transport.get_call_count(), 1);
    assert_eq!(discovery.get_call_count(), 0);
}
