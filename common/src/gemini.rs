//! Gemini API のリクエスト/レスポンス型
//!
//! HTTP送信は呼び出し側（CLI）が行い、ここではJSON形式のみを扱う。

use crate::error::Result;
use crate::types::AnalysisRequest;
use serde::{Deserialize, Serialize};

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl From<&AnalysisRequest> for GeminiRequest {
    /// 指示文を先頭に、画像を2番目のパートとして1つのcontentにまとめる
    fn from(request: &AnalysisRequest) -> Self {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: request.instruction.clone(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.payload.media_type.as_str().to_string(),
                            data: request.payload.data.clone(),
                        },
                    },
                ],
            }],
        }
    }
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GeminiResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// 最初の候補のテキストパートを連結して返す
    ///
    /// 連結結果が空ならNone。
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 候補なしでブロックされた場合の理由
    pub fn block_reason(&self) -> Option<&str> {
        if !self.candidates.is_empty() {
            return None;
        }
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// エラーレスポンス `{"error": {"code": 400, "message": "...", "status": "..."}}`
#[derive(Debug, Deserialize)]
pub struct GeminiErrorResponse {
    pub error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GeminiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// エラーレスポンスからメッセージを取り出す（JSONでなければ本文をそのまま返す）
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
