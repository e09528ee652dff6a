//! 解析パイプラインの型定義
//!
//! CLIと対話モードで共有される型:
//! - MediaType: ファイルの宣言MIMEタイプ
//! - UploadedFile: 選択されたファイル
//! - EncodedPayload: Base64化したファイル内容
//! - AnalysisRequest: モデルへ送る (指示文, 画像) の組
//! - FormVariant / UiState: フォームの挙動と表示状態

use serde::{Deserialize, Serialize};

/// 宣言MIMEタイプ
///
/// ブラウザの `File.type` と同じく、中身ではなく申告された型を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

/// 解析を受け付ける画像形式
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// 判別できないファイルの型
pub const OCTET_STREAM: &str = "application/octet-stream";

impl MediaType {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self(media_type.into())
    }

    /// 拡張子からMIMEタイプを推定（大文字小文字は区別しない）
    pub fn from_extension(ext: &str) -> Option<Self> {
        let media_type = match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" => "image/jpg",
            "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "heic" => "image/heic",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            "json" => "application/json",
            "doc" => "application/msword",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            _ => return None,
        };
        Some(Self::new(media_type))
    }

    pub fn octet_stream() -> Self {
        Self::new(OCTET_STREAM)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 許可リスト（PNG/JPG/JPEG）に含まれるか
    pub fn is_accepted_image(&self) -> bool {
        ACCEPTED_IMAGE_TYPES.contains(&self.0.as_str())
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 選択されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// 表示名
    pub name: String,
    pub media_type: MediaType,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: MediaType, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            content,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Data URLプレフィックスを除いたBase64データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub media_type: MediaType,
    pub data: String,
}

/// モデルへ送るリクエスト（順序: 指示文 → 画像）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub instruction: String,
    pub payload: EncodedPayload,
}

/// フォームの挙動
///
/// - Question: 自由入力の質問、ファイル形式チェックなし
/// - Rating: 固定プロンプト、PNG/JPG/JPEGのみ受け付け
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    #[default]
    Question,
    Rating,
}

impl FormVariant {
    /// 指示文の入力が必須か
    pub fn requires_instruction(&self) -> bool {
        matches!(self, FormVariant::Question)
    }

    /// ファイル選択時に形式チェックを行うか
    pub fn validates_file_type(&self) -> bool {
        matches!(self, FormVariant::Rating)
    }
}

impl std::str::FromStr for FormVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "question" | "q" | "a" => Ok(FormVariant::Question),
            "rating" | "rate" | "b" => Ok(FormVariant::Rating),
            _ => Err(format!("Unknown variant: {}. Use question or rating", s)),
        }
    }
}

impl std::fmt::Display for FormVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormVariant::Question => write!(f, "question"),
            FormVariant::Rating => write!(f, "rating"),
        }
    }
}

/// 表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// まだ一度も実行していない
    Idle,
    /// リクエスト送信中（入力無効化）
    Pending,
    /// 結果またはエラーを表示中
    Settled,
}

impl UiState {
    pub fn from_flags(loading: bool, settled_once: bool) -> Self {
        match (loading, settled_once) {
            (true, _) => UiState::Pending,
            (false, true) => UiState::Settled,
            (false, false) => UiState::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Pending => "pending",
            UiState::Settled => "settled",
        }
    }

    /// 入力コントロールを無効化すべきか
    pub fn inputs_disabled(&self) -> bool {
        matches!(self, UiState::Pending)
    }
}
