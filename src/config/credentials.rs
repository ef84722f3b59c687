use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::config::loader::{env_api_key, load_from, save_to};
use crate::config::types::{ApiKeySource, Config};

/// 설치 시 기본으로 들어가는 자리표시자
pub const PLACEHOLDER_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// API 키 저장소. 값의 유효성은 `usable_key` 로 판정한다.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, key: &str) -> Result<()>;
}

/// 비어 있거나 자리표시자면 None
pub fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
}

pub fn is_configured(key: Option<&str>) -> bool {
    usable_key(key.map(str::to_string)).is_some()
}

/// config.toml 의 `gemini_api_key`. 파일에 없으면 GEMINI_API_KEY 환경 변수.
pub struct ConfigFileStore {
    path: PathBuf,
}

impl ConfigFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::config::get_config_path()?))
    }

    fn read_config(&self) -> Result<Config> {
        if self.path.exists() {
            load_from(&self.path)
        } else {
            Ok(Config::default())
        }
    }
}

impl CredentialStore for ConfigFileStore {
    fn get(&self) -> Option<String> {
        let from_file = match self.read_config() {
            Ok(config) => config.gemini_api_key,
            Err(e) => {
                tracing::warn!(error = %e, "설정 파일에서 키를 읽지 못함");
                None
            }
        };

        from_file.or_else(env_api_key)
    }

    fn set(&self, key: &str) -> Result<()> {
        let mut config = self.read_config()?;
        config.gemini_api_key = Some(key.to_string());
        config.api_key_source = ApiKeySource::ConfigFile;
        save_to(&config, &self.path)
    }
}

/// 프로세스 내 저장소
#[derive(Default)]
pub struct MemoryStore {
    key: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(key: Option<String>) -> Self {
        Self { key: RwLock::new(key) }
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self::new(Some(key.into()))
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.key.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, key: &str) -> Result<()> {
        let mut guard = self
            .key
            .write()
            .map_err(|_| anyhow!("키 저장소 잠금 실패"))?;
        *guard = Some(key.to_string());
        Ok(())
    }
}
