//! プロンプト
//!
//! 採点モードでは固定プロンプト、質問モードではユーザー入力をそのまま使う。

use crate::types::FormVariant;

/// 採点モードの固定プロンプト
pub const DEFAULT_PROMPT: &str =
    "analyse my resume and rate it out of 100 and also give suggestions if any";

/// モデルへ送る指示文を決定
///
/// 質問モードでは入力を加工せずに返す（空文字チェックは呼び出し側）。
pub fn resolve_instruction(variant: FormVariant, user_instruction: &str) -> String {
    match variant {
        FormVariant::Question => user_instruction.to_string(),
        FormVariant::Rating => DEFAULT_PROMPT.to_string(),
    }
}
