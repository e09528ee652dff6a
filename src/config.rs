use crate::error::{ResumeAiError, Result};
use resume_ai_common::FormVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIキーを読む環境変数（先勝ち）
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "NEXT_PUBLIC_API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub variant: FormVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            timeout_seconds: 120,
            variant: FormVariant::Question,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ResumeAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("resume-ai").join("config.json"))
    }

    /// APIキーを取得（環境変数を優先）
    ///
    /// 形式チェックはしない。未設定なら空文字を返し、API呼び出し時に失敗させる。
    pub fn resolve_api_key(&self) -> String {
        Self::api_key_from(|name| std::env::var(name).ok()).unwrap_or_else(|| {
            self.api_key.clone().unwrap_or_default()
        })
    }

    fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }
}
