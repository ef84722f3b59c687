use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::config::types::{Config, ApiKeySource};

const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        load_from(&config_path)?
    } else {
        debug!("설정 파일 없음, 기본 설정 사용");
        Config::default()
    };

    // 파일에 키가 없으면 환경 변수에서 로드
    if config.gemini_api_key.is_none() {
        if let Some(key) = env_api_key() {
            config.gemini_api_key = Some(key);
            config.api_key_source = ApiKeySource::Environment;
        }
    }

    Ok(config)
}

pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

pub fn load_from(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "설정 파일 로드 중");

    let content = fs::read_to_string(path)
        .with_context(|| format!("설정 파일 읽기 실패: {}", path.display()))?;

    toml::from_str(&content)
        .context("설정 파일 파싱 실패")
}

pub fn save_config(config: &Config) -> Result<PathBuf> {
    let config_path = get_config_path()?;
    save_to(config, &config_path)?;
    Ok(config_path)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context("설정 디렉토리 생성 실패")?;
    }

    let content = toml::to_string_pretty(config)
        .context("설정 직렬화 실패")?;

    fs::write(path, content)
        .context("설정 파일 저장 실패")?;

    debug!(path = %path.display(), "설정 저장 완료");
    Ok(())
}

pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("설정 디렉토리를 찾을 수 없습니다")?;

    Ok(config_dir.join("codesage").join("config.toml"))
}
