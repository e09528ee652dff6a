//! Gemini API クライアント
//!
//! `generateContent` に (指示文, 画像) を1回だけ送信し、生成テキストを返す。
//! リトライ・ストリーミングは行わない。

use crate::config::Config;
use crate::error::{AnalysisFailure, ResumeAiError, Result};
use async_trait::async_trait;
use resume_ai_common::{extract_error_message, AnalysisRequest, GeminiRequest, GeminiResponse};
use std::time::Duration;

/// マルチモーダル生成モデル
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// 指示文と画像から1つのテキスト補完を生成
    async fn generate_content(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<String, AnalysisFailure>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = build_http_client(reqwest::Client::builder().timeout(timeout))?;
        Ok(Self::with_http_client(client, api_key, model, base_url))
    }

    /// 構築済みのHTTPクライアントを使う
    pub fn with_http_client(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key();
        if api_key.is_empty() {
            log::warn!("APIキーが未設定です（GEMINI_API_KEY または config --set-api-key）");
        }
        Self::new(
            api_key,
            config.model.as_str(),
            config.api_base_url.as_str(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// HTTPクライアントの構築失敗は設定エラーとして扱う
fn build_http_client(builder: reqwest::ClientBuilder) -> Result<reqwest::Client> {
    builder
        .build()
        .map_err(|e| ResumeAiError::Config(format!("HTTPクライアントを作成できません: {}", e)))
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<String, AnalysisFailure> {
        let body = GeminiRequest::from(request);
        let url = self.endpoint();

        log::debug!(
            "Gemini API呼び出し: model={}, mime_type={}, payload={} chars",
            self.model,
            request.payload.media_type,
            request.payload.data.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&text);
            log::warn!("Gemini APIエラー {}: {}", status, message);
            return Err(AnalysisFailure::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = GeminiResponse::from_json(&text)
            .map_err(|e| AnalysisFailure::MalformedResponse(e.to_string()))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(AnalysisFailure::Service {
                status: status.as_u16(),
                message: format!("プロンプトがブロックされました: {}", reason),
            });
        }

        let output = parsed
            .text()
            .ok_or_else(|| AnalysisFailure::MalformedResponse("レスポンスにテキストがありません".into()))?;

        log::debug!("Gemini API応答: {} chars", output.len());
        Ok(output)
    }
}
