//! 対話モード
//!
//! Webフォームと同じ操作（ファイル選択・質問入力・実行）を端末で繰り返す。
//! エラーはセッション内で通知として表示し、ループは継続する。

use crate::error::{ResumeAiError, Result};
use crate::gemini::GenerativeModel;
use crate::session::Session;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use resume_ai_common::FormVariant;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SelectFile,
    SetInstruction,
    Run,
    Show,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::SelectFile => "ファイルを選択",
            Action::SetInstruction => "質問を入力",
            Action::Run => "解析を実行",
            Action::Show => "状態を表示",
            Action::Quit => "終了",
        }
    }

    /// モードごとのメニュー（採点モードは質問入力なし）
    fn menu(variant: FormVariant) -> Vec<Action> {
        let mut actions = vec![Action::SelectFile];
        if variant.requires_instruction() {
            actions.push(Action::SetInstruction);
        }
        actions.extend([Action::Run, Action::Show, Action::Quit]);
        actions
    }
}

/// 読み込み中スピナーを表示しながら解析を実行
pub async fn run_with_spinner<M: GenerativeModel>(session: &mut Session<M>) -> Result<String> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Finding...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.run_analysis().await.map(str::to_string);
    spinner.finish_and_clear();
    outcome
}

/// 通知をトースト代わりに標準エラーへ出す
pub fn flush_notices<M: GenerativeModel>(session: &mut Session<M>) {
    for notice in session.take_notices() {
        eprintln!("⚠ {}", notice);
    }
}

pub async fn run_interactive<M: GenerativeModel>(mut session: Session<M>) -> Result<()> {
    println!("📝 resume-ai - 対話モード ({})\n", session.variant());

    let menu = Action::menu(session.variant());
    let labels: Vec<&str> = menu.iter().map(Action::label).collect();

    loop {
        let index = Select::new()
            .with_prompt(format!("操作を選択 [{}]", session.state().as_str()))
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| ResumeAiError::Terminal(e.to_string()))?;

        match menu[index] {
            Action::SelectFile => {
                let path: String = prompt_text("画像ファイルのパス")?;
                match session.select_path(&PathBuf::from(path.trim())).await {
                    Ok(()) => {
                        if let (Some(file), Some(preview)) = (session.file(), session.preview()) {
                            println!("✔ {} ({}) {}", file.name, file.media_type, preview);
                        }
                    }
                    // 形式エラーは通知として表示される
                    Err(e) if e.notice().is_some() => log::debug!("ファイル選択エラー: {}", e),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Action::SetInstruction => {
                let text = prompt_text("質問")?;
                session.set_instruction(text);
            }
            Action::Run => {
                if let Ok(text) = run_with_spinner(&mut session).await {
                    println!("\n{}\n", text);
                }
            }
            Action::Show => print_state(&session),
            Action::Quit => break,
        }

        flush_notices(&mut session);
    }

    Ok(())
}

fn prompt_text(prompt: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| ResumeAiError::Terminal(e.to_string()))
}

fn print_state<M: GenerativeModel>(session: &Session<M>) {
    println!("状態:");
    println!("  モード: {}", session.variant());
    println!("  状態: {}", session.state().as_str());
    match session.file() {
        Some(file) => println!("  ファイル: {} ({}, {} bytes)", file.name, file.media_type, file.len()),
        None => println!("  ファイル: 未選択"),
    }
    if session.variant().requires_instruction() {
        println!("  質問: {}", session.instruction());
    }
    match session.result() {
        Some(text) => println!("  結果:\n{}", text),
        None => println!("  結果: なし"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_per_variant() {
        assert_eq!(
            Action::menu(FormVariant::Question),
            vec![Action::SelectFile, Action::SetInstruction, Action::Run, Action::Show, Action::Quit]
        );
        assert_eq!(
            Action::menu(FormVariant::Rating),
            vec![Action::SelectFile, Action::Run, Action::Show, Action::Quit]
        );
    }
}
