use clap::Parser;
use resume_ai::{cli, config, error, gemini, interactive, session};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use gemini::GeminiClient;
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { file, prompt, variant, output } => {
            let variant = variant.unwrap_or(config.variant);
            println!("📄 resume-ai - 履歴書解析 ({})\n", variant);

            let client = GeminiClient::from_config(&config)?;
            log::info!("モデル: {}", client.model());
            let mut session = Session::new(client, variant);

            // 1. ファイル選択
            let selected = session.select_path(&file).await;
            interactive::flush_notices(&mut session);
            selected?;
            if let (Some(file), Some(preview)) = (session.file(), session.preview()) {
                println!("✔ {} ({}, {} bytes)", file.name, file.media_type, file.len());
                println!("  プレビュー: {}\n", preview);
            }

            // 2. 解析
            session.set_instruction(prompt);
            let outcome = interactive::run_with_spinner(&mut session).await;
            interactive::flush_notices(&mut session);
            let text = outcome?;

            println!("{}", text);

            // 3. 結果保存
            if let Some(output) = output {
                std::fs::write(&output, &text)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Interactive { variant } => {
            let variant = variant.unwrap_or(config.variant);
            let client = GeminiClient::from_config(&config)?;
            interactive::run_interactive(Session::new(client, variant)).await?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  モード: {}", config.variant);
                println!(
                    "  APIキー: {}",
                    if config.resolve_api_key().is_empty() { "未設定" } else { "設定済み" }
                );
            }
        }
    }

    Ok(())
}

/// `-v` でdebug、それ以外はwarn（RUST_LOGが優先）
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
