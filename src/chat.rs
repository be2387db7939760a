//! 対話式チャットモジュール
//!
//! 1行ずつ問い合わせを受け付け、`Assistant::answer` の応答を表示する。

use crate::assistant::{Assistant, ReplySource};
use crate::error::{LookupError, Result};
use dialoguer::Input;

/// 入力1行に対する操作
#[derive(Debug, PartialEq, Eq)]
pub enum ChatAction {
    /// 問い合わせ
    Ask(String),
    /// 空行（何もしない）
    Empty,
    /// 終了
    Quit,
}

/// 入力行を操作に変換
pub fn parse_chat_input(input: &str) -> ChatAction {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "" => ChatAction::Empty,
        "q" | "quit" | "exit" => ChatAction::Quit,
        _ => ChatAction::Ask(trimmed.to_string()),
    }
}

/// 対話モードを実行
pub async fn run_interactive_chat(assistant: &Assistant) -> Result<()> {
    println!("🚗 登録番号を入力してください（例: ABC-1234）");
    println!(
        "   {}台登録済み / AI: {}",
        assistant.engine().len(),
        if assistant.has_llm() { "有効" } else { "無効（ローカル検索のみ）" }
    );
    println!("---");
    println!("操作: [q]終了");
    println!("---\n");

    loop {
        let input: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| LookupError::CliExecution(e.to_string()))?;

        match parse_chat_input(&input) {
            ChatAction::Empty => continue,
            ChatAction::Quit => {
                println!("終了します");
                break;
            }
            ChatAction::Ask(message) => {
                let reply = assistant.answer(&message).await;
                if reply.source == ReplySource::Local && assistant.has_llm() {
                    println!("(AIに接続できないためローカル検索で応答)");
                }
                println!("{}\n", reply.text);
            }
        }
    }

    Ok(())
}
