use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// LLMを使わずローカル検索のみ
    #[default]
    None,
    Openai,
    Claude,
    Codex,
    Gemini,
}

impl AiProvider {
    /// 外部CLIのコマンド名（HTTP/無効の場合はNone）
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::Claude => Some("claude"),
            AiProvider::Codex => Some("codex"),
            AiProvider::Gemini => Some("gemini"),
            AiProvider::Openai | AiProvider::None => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != AiProvider::None
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::None => write!(f, "none"),
            AiProvider::Openai => write!(f, "openai"),
            AiProvider::Claude => write!(f, "claude"),
            AiProvider::Codex => write!(f, "codex"),
            AiProvider::Gemini => write!(f, "gemini"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(AiProvider::Claude.command_name(), Some("claude"));
        assert_eq!(AiProvider::Gemini.command_name(), Some("gemini"));
        assert_eq!(AiProvider::Openai.command_name(), None);
        assert!(!AiProvider::None.is_enabled());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&AiProvider::Openai).unwrap(), "\"openai\"");
        let p: AiProvider = serde_json::from_str("\"codex\"").unwrap();
        assert_eq!(p, AiProvider::Codex);
    }
}
