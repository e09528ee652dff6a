//! Resume AI Common Library
//!
//! 履歴書解析パイプラインで共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod prompts;
pub mod encoding;
pub mod gemini;

pub use types::{
    AnalysisRequest, EncodedPayload, FormVariant, MediaType, UiState, UploadedFile,
    ACCEPTED_IMAGE_TYPES,
};
pub use error::{Error, Result};
pub use prompts::{resolve_instruction, DEFAULT_PROMPT};
pub use encoding::{encode_payload, extract_base64_from_data_url, to_data_url};
pub use gemini::{extract_error_message, GeminiRequest, GeminiResponse};
