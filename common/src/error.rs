//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
