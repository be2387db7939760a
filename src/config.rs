use crate::ai_provider::AiProvider;
use crate::error::{LookupError, Result};
use car_lookup_common::engine::DEFAULT_MIN_ACCEPTABLE_CONFIDENCE;
use car_lookup_common::{SearchOptions, DEFAULT_PLATE_FIELD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const ADMIN_HASH_ENV: &str = "ADMIN_PASSWORD_HASH";
pub const SALT_ENV: &str = "CAR_LOOKUP_SALT";
pub const ROSTER_ENV: &str = "CAR_LOOKUP_ROSTER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roster_path: Option<PathBuf>,
    /// 登録番号列のヘッダー名
    pub plate_field: String,
    /// ローカル検索で採用する最低信頼度
    pub min_confidence: u8,
    pub provider: AiProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub max_tokens: u32,
    pub admin_password_hash: Option<String>,
    pub salt: String,
    pub organization: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: None,
            plate_field: DEFAULT_PLATE_FIELD.into(),
            min_confidence: DEFAULT_MIN_ACCEPTABLE_CONFIDENCE,
            provider: AiProvider::None,
            model: "gpt-3.5-turbo-0125".into(),
            api_key: None,
            api_base_url: "https://api.openai.com/v1".into(),
            max_tokens: 150,
            admin_password_hash: None,
            salt: "car-lookup-salt".into(),
            organization: "St. John's Indian Orthodox Church (SJIOC)".into(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LookupError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("car-lookup").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(LookupError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn admin_password_hash(&self) -> Option<String> {
        std::env::var(ADMIN_HASH_ENV)
            .ok()
            .filter(|h| !h.trim().is_empty())
            .or_else(|| self.admin_password_hash.clone())
    }

    pub fn salt(&self) -> String {
        std::env::var(SALT_ENV).unwrap_or_else(|_| self.salt.clone())
    }

    /// 名簿のパス（引数 > 環境変数 > 設定ファイル）
    pub fn resolve_roster_path(&self, arg: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = arg {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(ROSTER_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        self.roster_path.clone().ok_or(LookupError::RosterNotConfigured)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            min_acceptable_confidence: self.min_confidence,
            ..Default::default()
        }
    }
}
