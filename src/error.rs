use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAiError {
    #[error("入力が不足しています（ファイルと質問を入力してください）")]
    MissingInput,

    #[error("対応していないファイル形式です: {0}（PNG/JPG/JPEGのみ）")]
    UnsupportedFileType(String),

    #[error("解析リクエストに失敗: {0}")]
    AnalysisRequestFailed(#[from] AnalysisFailure),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("端末入力エラー: {0}")]
    Terminal(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

/// 解析リクエスト失敗の内訳
///
/// 画面上は1種類のエラーとして扱うが、呼び出し側のために原因を残す。
#[derive(Error, Debug)]
pub enum AnalysisFailure {
    #[error("エンコード失敗: {0}")]
    Encoding(String),

    #[error("通信エラー: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("APIエラー (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("APIレスポンスが不正: {0}")]
    MalformedResponse(String),
}

impl ResumeAiError {
    /// 利用者に表示する通知
    ///
    /// パイプライン以外のエラーには対応する通知がない。
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ResumeAiError::MissingInput => Some(Notice::MissingInput),
            ResumeAiError::UnsupportedFileType(_) => Some(Notice::UnsupportedFileType),
            ResumeAiError::AnalysisRequestFailed(_) => Some(Notice::AnalysisRequestFailed),
            _ => None,
        }
    }
}

/// トースト通知に相当するメッセージ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MissingInput,
    UnsupportedFileType,
    AnalysisRequestFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingInput => "Please enter all fields",
            Notice::UnsupportedFileType => "Only PNG, JPG and JPEG images are supported",
            Notice::AnalysisRequestFailed => "An error occurred, try Again",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

pub type Result<T> = std::result::Result<T, ResumeAiError>;
