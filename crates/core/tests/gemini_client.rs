//! Gemini client against a mock API server

use serde_json::json;
use vidbrief_core::{
    AnalysisResult, AnalysisStatus, CatalogSource, GeminiClient, MemoryStore, ModelDescriptor,
    PreferenceStore, ProviderConfig, VidbriefError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_partial_json, header, method, path, query_param},
};

fn client_for(server: &MockServer, api_key: Option<&str>) -> GeminiClient<MemoryStore> {
    let client = GeminiClient::new(
        ProviderConfig::new(format!("{}/v1beta", server.uri())),
        MemoryStore::new(),
    );
    if let Some(key) = api_key {
        client.preferences().set_api_key(key).unwrap();
    }
    client
}

fn reply_with_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn test_missing_key_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);

    let err = client.fetch_available_models().await.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "Please enter your Gemini API key to fetch available models"
    );

    let err = client.analyze_video("clip.mp4").await.unwrap_err();
    assert!(matches!(err, VidbriefError::MissingApiKey { .. }));
    assert_eq!(
        err.to_string(),
        "Please enter your Gemini API key to analyze videos"
    );
}

#[tokio::test]
async fn test_catalog_filters_and_describes_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "models/text-bison-001", "description": "PaLM text model"},
                {"name": "models/gemini-1.5-flash-exp"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let catalog = client.fetch_available_models().await.unwrap();

    assert_eq!(catalog.source, CatalogSource::Live);
    assert_eq!(
        catalog.models,
        vec![ModelDescriptor {
            id: "gemini-1.5-flash-exp".to_string(),
            name: "Gemini 1.5 flash exp".to_string(),
            description: "Optimized for speed and efficiency".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_catalog_server_error_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let catalog = client.fetch_available_models().await.unwrap();

    assert!(catalog.is_fallback());
    let expected = [
        ("gemini-1.5-pro", "Gemini 1.5 Pro", "Most capable model for highly complex tasks"),
        ("gemini-1.5-flash", "Gemini 1.5 Flash", "Faster responses with slightly lower quality"),
        ("gemini-1.0-pro", "Gemini 1.0 Pro", "Previous generation pro model"),
        ("gemini-1.0-pro-vision", "Gemini 1.0 Pro Vision", "Specialized for vision tasks"),
    ];
    assert_eq!(catalog.models.len(), expected.len());
    for (model, (id, name, description)) in catalog.models.iter().zip(expected) {
        assert_eq!(model.id, id);
        assert_eq!(model.name, name);
        assert_eq!(model.description, description);
    }
}

#[tokio::test]
async fn test_catalog_garbage_body_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let catalog = client.fetch_available_models().await.unwrap();
    assert!(catalog.is_fallback());
}

#[tokio::test]
async fn test_analysis_decodes_valid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "safetySettings": [
                {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"}
            ]
        })))
        .respond_with(reply_with_text(
            r#"{"summary":"S","keyPoints":["a","b"],"sentiment":"neutral","topics":["x"]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let analysis = client.analyze_video("clip.mp4").await.unwrap();

    assert_eq!(analysis.status, AnalysisStatus::Genuine);
    assert_eq!(
        analysis.result,
        AnalysisResult {
            summary: "S".to_string(),
            key_points: vec!["a".to_string(), "b".to_string()],
            sentiment: "neutral".to_string(),
            topics: vec!["x".to_string()],
        }
    );
}

#[tokio::test]
async fn test_analysis_non_json_reply_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply_with_text("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let analysis = client.analyze_video("https://example.com/v.mp4").await.unwrap();

    assert_eq!(
        analysis.status,
        AnalysisStatus::Degraded {
            raw: "not json at all".to_string()
        }
    );
    assert_eq!(analysis.result.topics, ["API Error", "Parsing Issue"]);
    assert!(
        analysis
            .result
            .summary
            .starts_with("The API response couldn't be parsed as JSON.")
    );
    assert!(analysis.result.summary.contains("not json at all..."));
}

#[tokio::test]
async fn test_analysis_uses_selected_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-stale-id:generateContent"))
        .respond_with(reply_with_text(
            r#"{"summary":"","keyPoints":[],"sentiment":"","topics":[]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    client.preferences().set_model("gemini-stale-id").unwrap();

    let analysis = client.analyze_video("clip.mp4").await.unwrap();
    assert!(!analysis.is_degraded());
}

#[tokio::test]
async fn test_analysis_http_error_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("bad-key"));
    let err = client.analyze_video("clip.mp4").await.unwrap_err();

    assert!(matches!(err, VidbriefError::Remote { .. }));
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn test_analysis_blocked_reply_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let err = client.analyze_video("clip.mp4").await.unwrap_err();
    assert!(matches!(err, VidbriefError::Remote { .. }));
    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn test_key_is_read_from_store_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("key", "rotated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("original"));
    client
        .preferences()
        .store()
        .set("geminiApiKey", "rotated")
        .unwrap();

    let catalog = client.fetch_available_models().await.unwrap();
    assert_eq!(catalog.source, CatalogSource::Live);
    assert!(catalog.models.is_empty());
}

#[tokio::test]
async fn test_catalog_without_models_field_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let catalog = client.fetch_available_models().await.unwrap();
    assert!(catalog.is_fallback());
    assert_eq!(catalog.models.len(), 4);
}

fn unreachable_client(api_key: &str) -> GeminiClient<MemoryStore> {
    let client = GeminiClient::new(
        ProviderConfig::new("http://127.0.0.1:1/v1beta"),
        MemoryStore::new(),
    );
    client.preferences().set_api_key(api_key).unwrap();
    client
}

#[tokio::test]
async fn test_catalog_connection_refused_returns_fallback() {
    let client = unreachable_client("secret-key-123");
    let catalog = client.fetch_available_models().await.unwrap();
    assert!(catalog.is_fallback());
}

#[tokio::test]
async fn test_analysis_connection_refused_hides_key() {
    let client = unreachable_client("secret-key-123");
    let err = client.analyze_video("clip.mp4").await.unwrap_err();

    assert!(matches!(err, VidbriefError::Remote { .. }));
    let message = err.to_string();
    assert!(!message.is_empty());
    assert!(!message.contains("secret-key-123"));
    assert!(!message.contains("key="));
}
