// Wire-level tests for the REST clients, against a local mock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use horselab_backend::config::Config;
use horselab_backend::errors::AppError;
use horselab_backend::llm::gemini_image_client::build_gemini_image_client;
use horselab_backend::llm::gemini_text_client::build_gemini_text_client;
use horselab_backend::llm::{AiClient, ImageModelClient, ReplyPart};
use horselab_backend::services::mint::{MintClient, MintRequest, build_crossmint_client};
use horselab_backend::storage::BlobStore;
use horselab_backend::storage::gcs::build_gcs_blob_store;
use horselab_backend::test_helpers::TINY_PNG_B64;

fn config_for(server: &MockServer) -> Arc<Config> {
    Arc::new(Config {
        gemini_api_key: Some("test-key".to_string()),
        gemini_api_base_url: server.uri(),
        storage_bucket: Some("test-bucket".to_string()),
        storage_api_base_url: server.uri(),
        mint_api_key: Some("test-mint-key".to_string()),
        mint_wallet_address: Some("0xabc".to_string()),
        mint_chain: Some("polygon-amoy".to_string()),
        mint_api_base_url: server.uri(),
        ..Default::default()
    })
}

#[tokio::test]
async fn text_client_joins_candidate_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here you go: "},
                        {"text": "{\"name\":\"テスト\"}"}
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_gemini_text_client(config_for(&server)).unwrap();
    let reply = client.generate_text("make a horse").await.unwrap();

    assert_eq!(reply, "Here you go: {\"name\":\"テスト\"}");
}

#[tokio::test]
async fn text_client_maps_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let client = build_gemini_text_client(config_for(&server)).unwrap();
    let err = client.generate_text("make a horse").await.unwrap_err();

    match err {
        AppError::TextGenerationError(msg) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("quota exceeded"));
        }
        other => panic!("expected TextGenerationError, got {other:?}"),
    }
}

#[tokio::test]
async fn text_client_rejects_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let client = build_gemini_text_client(config_for(&server)).unwrap();
    let err = client.generate_text("make a horse").await.unwrap_err();

    assert!(matches!(err, AppError::TextGenerationError(_)));
}

#[tokio::test]
async fn image_client_surfaces_inline_data_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/gemini-2.0-flash-preview-image-generation:generateContent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "sure"},
                        {"inlineData": {"mimeType": "image/png", "data": TINY_PNG_B64}}
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_gemini_image_client(config_for(&server)).unwrap();
    let reply = client.generate_image("draw a horse").await.unwrap();

    assert_eq!(reply.parts.len(), 2);
    assert!(matches!(
        &reply.parts[1],
        ReplyPart::InlineData { mime_type, .. } if mime_type == "image/png"
    ));
}

#[tokio::test]
async fn image_client_maps_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "internal", "status": "INTERNAL"}
        })))
        .mount(&server)
        .await;

    let client = build_gemini_image_client(config_for(&server)).unwrap();
    let err = client.generate_image("draw a horse").await.unwrap_err();

    assert!(matches!(err, AppError::ImageGenerationError(_)));
}

#[tokio::test]
async fn gcs_store_uploads_media_and_returns_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/test-bucket/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "output/abc.png"))
        .and(header("Content-Type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "output/abc.png", "bucket": "test-bucket"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = build_gcs_blob_store(config_for(&server)).unwrap();
    let url = store
        .upload("output/abc.png", vec![1, 2, 3], "image/png")
        .await
        .unwrap();

    assert_eq!(url, format!("{}/test-bucket/output/abc.png", server.uri()));
}

#[tokio::test]
async fn gcs_store_sends_bearer_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer oauth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Arc::new(Config {
        storage_access_token: Some("oauth-token".to_string()),
        ..(*config_for(&server)).clone()
    });
    let store = build_gcs_blob_store(config).unwrap();
    store
        .upload("output/abc.png", vec![1], "image/png")
        .await
        .unwrap();
}

#[tokio::test]
async fn gcs_store_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let store = build_gcs_blob_store(config_for(&server)).unwrap();
    let err = store
        .upload("output/abc.png", vec![1], "image/png")
        .await
        .unwrap_err();

    match err {
        AppError::StorageError(msg) => assert!(msg.contains("403")),
        other => panic!("expected StorageError, got {other:?}"),
    }
}

#[tokio::test]
async fn mint_client_posts_wire_shape_with_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/2022-06-09/collections/default/nfts"))
        .and(header("x-api-key", "test-mint-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "mint-123", "onChain": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_crossmint_client(config_for(&server)).unwrap();
    let receipt = client
        .mint(MintRequest::new(
            "0xabc",
            "polygon-amoy",
            "テスト",
            "https://storage.example/test-bucket/output/x.png",
        ))
        .await
        .unwrap();

    assert_eq!(receipt.status, 200);
    assert!(receipt.body.contains("mint-123"));
}

#[tokio::test]
async fn mint_client_reports_error_status_in_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = build_crossmint_client(config_for(&server)).unwrap();
    let receipt = client
        .mint(MintRequest::new("0xabc", "polygon-amoy", "A", "https://x/y.png"))
        .await
        .unwrap();

    // The minting reply is logged, not acted on; an error status is still a
    // receipt, not an Err.
    assert_eq!(receipt.status, 401);
    assert_eq!(receipt.body, "bad key");
}
