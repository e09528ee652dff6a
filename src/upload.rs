//! ファイル選択
//!
//! ディスク上のファイルを読み込み、ブラウザと同じく拡張子から宣言型を決める。
//! 拡張子で判別できない場合のみ先頭バイトから画像形式を推定する。

use crate::error::{ResumeAiError, Result};
use image::ImageFormat;
use resume_ai_common::{MediaType, UploadedFile};
use std::path::Path;

/// プレビュー用の参照（ブラウザのObject URLに相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn from_path(path: &Path) -> Self {
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self(format!("file://{}", absolute.display().to_string().replace('\\', "/")))
    }

    /// メモリ上のファイル用
    pub fn memory(name: &str) -> Self {
        Self(format!("memory://{}", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ファイルを読み込んでUploadedFileを作る
pub async fn load_file(path: &Path) -> Result<UploadedFile> {
    if !path.is_file() {
        return Err(ResumeAiError::FileNotFound(path.display().to_string()));
    }

    let content = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let media_type = detect_media_type(path, &content);

    log::debug!("ファイル読み込み: {} ({}, {} bytes)", name, media_type, content.len());

    Ok(UploadedFile::new(name, media_type, content))
}

/// 宣言MIMEタイプを決める
pub fn detect_media_type(path: &Path, content: &[u8]) -> MediaType {
    path.extension()
        .and_then(|ext| MediaType::from_extension(&ext.to_string_lossy()))
        .or_else(|| sniff_image_type(content))
        .unwrap_or_else(MediaType::octet_stream)
}

fn sniff_image_type(content: &[u8]) -> Option<MediaType> {
    let media_type = match image::guess_format(content).ok()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        _ => return None,
    };
    Some(MediaType::new(media_type))
}
