//! ファイル内容のBase64化
//!
//! ファイルを一度Data URL（`data:<mime>;base64,<data>`）へ変換し、
//! カンマ以降のBase64部分だけをモデルへ送る。

use crate::error::{Error, Result};
use crate::types::{EncodedPayload, UploadedFile, OCTET_STREAM};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// ファイルをData URLへ変換
pub fn to_data_url(file: &UploadedFile) -> String {
    let mime = match file.media_type.as_str() {
        "" => OCTET_STREAM,
        other => other,
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(&file.content))
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、カンマがなければNone
///
/// MIMEタイプ側にカンマが含まれても、Base64部分にはカンマが現れないため最後のカンマで区切る。
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.rsplit_once(',').map(|(_, data)| data)
}

/// ファイルをモデル送信用ペイロードへ変換
///
/// MIMEタイプはData URLではなくファイルの宣言型をそのまま使う。
pub fn encode_payload(file: &UploadedFile) -> Result<EncodedPayload> {
    let data_url = to_data_url(file);
    let data = extract_base64_from_data_url(&data_url)
        .ok_or_else(|| Error::Encoding(format!("Data URLの形式が不正: {}", file.name)))?;

    Ok(EncodedPayload {
        media_type: file.media_type.clone(),
        data: data.to_string(),
    })
}
