//! LLM連携モジュール
//!
//! 不透明なテキスト補完サービスとして扱う。入力はシステムプロンプトと
//! ユーザーメッセージ、出力は応答テキストのみ。
//! - 外部CLI（claude / codex / gemini）
//! - OpenAI互換 chat completions API

mod cli_runner;
mod openai;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{LookupError, Result};
use std::time::Duration;

pub use openai::parse_completion;

/// LLMクライアント
#[derive(Debug, Clone)]
pub enum LlmClient {
    Cli {
        command: &'static str,
        timeout: Duration,
    },
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// 設定から生成（プロバイダが無効ならNone）
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        match config.provider {
            AiProvider::None => Ok(None),
            AiProvider::Openai => {
                let api_key = config.get_api_key()?;
                Ok(Some(LlmClient::OpenAi(openai::OpenAiClient::new(
                    api_key,
                    config.api_base_url.clone(),
                    config.model.clone(),
                    config.max_tokens,
                    timeout,
                )?)))
            }
            provider => {
                let command = provider.command_name().ok_or_else(|| {
                    LookupError::Config(format!("provider {} has no CLI command", provider))
                })?;
                Ok(Some(LlmClient::Cli { command, timeout }))
            }
        }
    }

    /// 補完を実行
    pub async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let response = match self {
            LlmClient::Cli { command, timeout } => {
                let prompt = format!("{}\n\nUser question: {}", system_prompt, user_message);
                cli_runner::run(command, &prompt, *timeout).await?
            }
            LlmClient::OpenAi(client) => client.chat(system_prompt, user_message).await?,
        };

        let response = response.trim().to_string();
        if response.is_empty() {
            return Err(LookupError::ApiParse("empty response".into()));
        }
        Ok(response)
    }
}
