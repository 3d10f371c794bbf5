use crate::error::{Result, SkySoulsError};
use serde::{Deserialize, Serialize};
use sky_souls_common::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;

/// APIのURLを上書きする環境変数
pub const API_URL_ENV: &str = "SKY_SOULS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SkySoulsError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("sky-souls").join("config.json"))
    }

    /// 一覧スナップショットの置き場
    pub fn session_dir() -> Result<PathBuf> {
        let cache = dirs::cache_dir()
            .ok_or_else(|| SkySoulsError::Config("캐시 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(cache.join("sky-souls").join("session"))
    }

    /// 実際に使うAPIのURL（引数 > 環境変数 > 設定ファイル）
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override.filter(|u| !u.trim().is_empty()) {
            return url.trim().to_string();
        }
        // 環境変数を優先
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim().to_string();
            }
        }
        self.api_url.clone()
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SkySoulsError::Config(format!(
                "URL은 http:// 또는 https:// 로 시작해야 합니다: {}",
                url
            )));
        }
        self.api_url = url;
        Ok(())
    }

    pub fn set_page_size(&mut self, size: u32) -> Result<()> {
        if size == 0 || size > 100 {
            return Err(SkySoulsError::Config(format!(
                "페이지 크기는 1~100 사이로 지정하세요: {}",
                size
            )));
        }
        self.page_size = size;
        Ok(())
    }
}
