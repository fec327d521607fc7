use crate::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 既定の画像生成モデル
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub bind: String,
    pub port: u16,
    /// 画像取得のタイムアウト（秒）
    pub fetch_timeout_seconds: u64,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DeckError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ksim-deck").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            bind: "0.0.0.0".into(),
            port: 3000,
            fetch_timeout_seconds: 10,
            static_dir: PathBuf::from("dist"),
        }
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(DeckError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 8080}"#).expect("デシリアライズ失敗");
        assert_eq!(config.port, 8080);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.fetch_timeout_seconds, 10);
        assert_eq!(config.static_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_blank_stored_key_is_missing() {
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return;
        }
        let config = Config {
            api_key: Some("  ".into()),
            ..Config::default()
        };
        assert!(matches!(config.get_api_key(), Err(DeckError::MissingApiKey)));
    }
}
