//! 解析セッション
//!
//! 1画面分の状態（選択ファイル・質問・結果・読み込み中フラグ）を保持し、
//! ファイル選択 → 検証 → Base64化 → リクエスト作成 → API呼び出し → 結果表示
//! の流れを管理する。
//!
//! `run_analysis` は `&mut self` を取るため、同じセッションで2つの解析が
//! 同時に走ることはない。

use crate::error::{AnalysisFailure, Notice, ResumeAiError, Result};
use crate::gemini::GenerativeModel;
use crate::upload::{self, PreviewRef};
use resume_ai_common::{
    encode_payload, resolve_instruction, AnalysisRequest, EncodedPayload, FormVariant, UiState,
    UploadedFile,
};
use std::path::Path;
use std::sync::Arc;

pub struct Session<M: GenerativeModel> {
    model: M,
    variant: FormVariant,
    file: Option<Arc<UploadedFile>>,
    preview: Option<PreviewRef>,
    instruction: String,
    result: Option<String>,
    loading: bool,
    settled_once: bool,
    notices: Vec<Notice>,
}

/// 読み込み中フラグを立て、スコープを抜けると必ず下ろす
///
/// 実行中のFutureが破棄された場合もPendingのまま残らない。
struct PendingGuard<'a> {
    loading: &'a mut bool,
}

impl<'a> PendingGuard<'a> {
    fn enter(loading: &'a mut bool) -> Self {
        *loading = true;
        Self { loading }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.loading = false;
    }
}

impl<M: GenerativeModel> Session<M> {
    pub fn new(model: M, variant: FormVariant) -> Self {
        Self {
            model,
            variant,
            file: None,
            preview: None,
            instruction: String::new(),
            result: None,
            loading: false,
            settled_once: false,
            notices: Vec::new(),
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn state(&self) -> UiState {
        UiState::from_flags(self.loading, self.settled_once)
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_deref()
    }

    pub fn preview(&self) -> Option<&PreviewRef> {
        self.preview.as_ref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// 直近に成功した解析結果
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// 未表示の通知を取り出す
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// メモリ上のファイルを選択
    pub fn select_file(&mut self, file: UploadedFile) -> Result<()> {
        let preview = PreviewRef::memory(&file.name);
        self.replace_file(file, preview)
    }

    /// ディスク上のファイルを読み込んで選択
    pub async fn select_path(&mut self, path: &Path) -> Result<()> {
        let file = upload::load_file(path).await?;
        self.replace_file(file, PreviewRef::from_path(path))
    }

    fn replace_file(&mut self, file: UploadedFile, preview: PreviewRef) -> Result<()> {
        if self.variant.validates_file_type() && !file.media_type.is_accepted_image() {
            log::info!("ファイル形式を拒否: {} ({})", file.name, file.media_type);
            return Err(self.reject(ResumeAiError::UnsupportedFileType(
                file.media_type.to_string(),
            )));
        }

        log::info!("ファイル選択: {} ({}, {} bytes)", file.name, file.media_type, file.len());
        self.file = Some(Arc::new(file));
        self.preview = Some(preview);
        Ok(())
    }

    /// 質問を設定（検証なし、そのまま保持）
    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
    }

    /// 解析を実行
    ///
    /// 失敗しても前回の結果は残る。成功時は結果を上書きして返す。
    pub async fn run_analysis(&mut self) -> Result<&str> {
        let instruction_missing =
            self.variant.requires_instruction() && self.instruction.is_empty();
        let file = match self.file.clone() {
            Some(file) if !instruction_missing => file,
            _ => return Err(self.reject(ResumeAiError::MissingInput)),
        };
        let instruction = resolve_instruction(self.variant, &self.instruction);

        let outcome = {
            let _pending = PendingGuard::enter(&mut self.loading);
            analyze(&self.model, file, instruction).await
        };
        self.settled_once = true;

        match outcome {
            Ok(text) => {
                log::info!("解析完了: {} chars", text.len());
                Ok(self.result.insert(text).as_str())
            }
            Err(failure) => {
                log::error!("解析失敗: {}", failure);
                Err(self.reject(ResumeAiError::AnalysisRequestFailed(failure)))
            }
        }
    }

    fn reject(&mut self, error: ResumeAiError) -> ResumeAiError {
        if let Some(notice) = error.notice() {
            self.notices.push(notice);
        }
        error
    }
}

async fn analyze<M: GenerativeModel>(
    model: &M,
    file: Arc<UploadedFile>,
    instruction: String,
) -> std::result::Result<String, AnalysisFailure> {
    let payload = encode(file).await?;
    let request = AnalysisRequest {
        instruction,
        payload,
    };
    let text = model.generate_content(&request).await?;
    if text.is_empty() {
        return Err(AnalysisFailure::MalformedResponse("空の応答".into()));
    }
    Ok(text)
}

/// Base64化（ブロッキング処理として別スレッドで実行）
async fn encode(file: Arc<UploadedFile>) -> std::result::Result<EncodedPayload, AnalysisFailure> {
    tokio::task::spawn_blocking(move || encode_payload(&file))
        .await
        .map_err(|e| AnalysisFailure::Encoding(e.to_string()))?
        .map_err(|e| AnalysisFailure::Encoding(e.to_string()))
}
