//! 解析パイプラインの統合テスト
//!
//! axumのスタブサーバーをGemini APIに見立て、
//! ファイル選択から結果表示までを通しで検証する。

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use resume_ai::error::{AnalysisFailure, Notice, ResumeAiError};
use resume_ai::gemini::GeminiClient;
use resume_ai::session::Session;
use resume_ai_common::{FormVariant, UiState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use tokio::net::TcpListener;

/// 受信したリクエスト
#[derive(Debug, Clone)]
struct Captured {
    /// `{model}:generateContent` のパス部分
    model: String,
    key: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn generate_content(
    State(stub): State<Stub>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    stub.captured.lock().unwrap().push(Captured {
        model,
        key: query.get("key").cloned(),
        body,
    });
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body,
    )
}

/// 固定レスポンスを返すスタブサーバーを起動し、ベースURLと受信記録を返す
async fn start_stub(status: u16, body: &'static str) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));

    let stub = Stub {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        captured: captured.clone(),
    };
    let app = Router::new()
        .route("/v1beta/models/:model", post(generate_content))
        .with_state(stub);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), captured)
}

fn client(base_url: &str) -> GeminiClient {
    // 環境のプロキシ設定を無視してローカルスタブへ直接接続
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("client build failed");
    GeminiClient::with_http_client(http, "test-key", "test-model", base_url)
}

/// 10KBのJPEGファイルを作成
fn write_jpeg(dir: &std::path::Path) -> (std::path::PathBuf, Vec<u8>) {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend((0..10 * 1024 - 4).map(|i| (i % 251) as u8));
    let path = dir.join("resume.jpeg");
    std::fs::write(&path, &bytes).unwrap();
    (path, bytes)
}

const SUCCESS_BODY: &str = r#"{
  "candidates": [{
    "content": { "parts": [{ "text": "Score: 72/100" }], "role": "model" },
    "finishReason": "STOP"
  }]
}"#;

#[tokio::test]
async fn test_end_to_end_question_variant() {
    let (base_url, captured) = start_stub(200, SUCCESS_BODY).await;
    let dir = tempdir().unwrap();
    let (path, bytes) = write_jpeg(dir.path());

    let mut session = Session::new(client(&base_url), FormVariant::Question);
    session.select_path(&path).await.unwrap();
    session.set_instruction("Rate my resume");

    let result = session.run_analysis().await.unwrap().to_string();
    assert_eq!(result, "Score: 72/100");
    assert_eq!(session.result(), Some("Score: 72/100"));
    assert_eq!(session.state(), UiState::Settled);
    assert!(session.preview().unwrap().as_str().starts_with("file://"));

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.model, "test-model:generateContent");
    assert_eq!(request.key.as_deref(), Some("test-key"));

    let parts = request.body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["text"], "Rate my resume");
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");

    let data = parts[1]["inline_data"]["data"].as_str().unwrap();
    assert!(!data.starts_with("data:"));
    assert_eq!(data, STANDARD.encode(&bytes));
}

#[tokio::test]
async fn test_service_error_is_analysis_failure() {
    let (base_url, captured) = start_stub(
        403,
        r#"{"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}}"#,
    )
    .await;
    let dir = tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path());

    let mut session = Session::new(client(&base_url), FormVariant::Rating);
    session.select_path(&path).await.unwrap();

    let err = session.run_analysis().await.unwrap_err();
    match err {
        ResumeAiError::AnalysisRequestFailed(AnalysisFailure::Service { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(session.state(), UiState::Settled);
    assert_eq!(session.notices(), &[Notice::AnalysisRequestFailed]);
    assert!(session.result().is_none());
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_response() {
    let (base_url, _) = start_stub(200, "<html>oops</html>").await;
    let dir = tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path());

    let mut session = Session::new(client(&base_url), FormVariant::Rating);
    session.select_path(&path).await.unwrap();

    let err = session.run_analysis().await.unwrap_err();
    assert!(matches!(
        err,
        ResumeAiError::AnalysisRequestFailed(AnalysisFailure::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_empty_text_reply_is_malformed() {
    let (base_url, _) = start_stub(
        200,
        r#"{"candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "STOP"}]}"#,
    )
    .await;
    let dir = tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path());

    let mut session = Session::new(client(&base_url), FormVariant::Rating);
    session.select_path(&path).await.unwrap();

    let err = session.run_analysis().await.unwrap_err();
    assert!(matches!(
        err,
        ResumeAiError::AnalysisRequestFailed(AnalysisFailure::MalformedResponse(_))
    ));
    assert!(session.result().is_none());
    assert_eq!(session.notices(), &[Notice::AnalysisRequestFailed]);
}

#[tokio::test]
async fn test_blocked_prompt_is_service_error() {
    let (base_url, _) = start_stub(200, r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).await;
    let dir = tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path());

    let mut session = Session::new(client(&base_url), FormVariant::Rating);
    session.select_path(&path).await.unwrap();

    let err = session.run_analysis().await.unwrap_err();
    assert!(matches!(
        err,
        ResumeAiError::AnalysisRequestFailed(AnalysisFailure::Service { status: 200, .. })
    ));
}

#[tokio::test]
async fn test_transport_error() {
    // 一度bindして閉じたポートへ接続させる
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path());

    let mut session = Session::new(client(&format!("http://{}", addr)), FormVariant::Rating);
    session.select_path(&path).await.unwrap();

    let err = session.run_analysis().await.unwrap_err();
    assert!(matches!(
        err,
        ResumeAiError::AnalysisRequestFailed(AnalysisFailure::Transport(_))
    ));
    assert_eq!(session.state(), UiState::Settled);
}

#[tokio::test]
async fn test_rating_variant_rejects_pdf_without_request() {
    let (base_url, captured) = start_stub(200, SUCCESS_BODY).await;
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("resume.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();

    let mut session = Session::new(client(&base_url), FormVariant::Rating);
    let err = session.select_path(&pdf).await.unwrap_err();
    assert!(matches!(err, ResumeAiError::UnsupportedFileType(_)));
    assert!(session.file().is_none());

    let err = session.run_analysis().await.unwrap_err();
    assert!(matches!(err, ResumeAiError::MissingInput));
    assert!(captured.lock().unwrap().is_empty());
    assert_eq!(
        session.take_notices(),
        vec![Notice::UnsupportedFileType, Notice::MissingInput]
    );
}
