use clap::{Parser, Subcommand};
use resume_ai_common::FormVariant;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ai")]
#[command(about = "履歴書画像をAIで解析・採点するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 履歴書画像を1回解析して結果を表示
    Analyze {
        /// 履歴書画像のパス
        #[arg(required = true)]
        file: PathBuf,

        /// 質問（questionモードでは必須）
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// フォームの挙動 (question/rating)、省略時は設定値
        #[arg(long)]
        variant: Option<FormVariant>,

        /// 結果を書き出すファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的にファイル選択・質問・解析を繰り返す
    Interactive {
        /// フォームの挙動 (question/rating)、省略時は設定値
        #[arg(long)]
        variant: Option<FormVariant>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
