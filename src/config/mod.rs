mod types;
mod loader;
mod validators;
mod credentials;

pub use types::*;
pub use loader::{load_config, save_config, get_config_path, load_from, save_to, env_api_key};
pub use validators::validate_config;
pub use credentials::{
    CredentialStore, ConfigFileStore, MemoryStore, PLACEHOLDER_KEY, is_configured, usable_key,
};

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

impl Config {
    pub fn load() -> Result<Self> {
        let config = load_config()?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        save_config(self)
    }

    pub fn has_api_key(&self) -> bool {
        is_configured(self.gemini_api_key.as_deref())
    }

    pub fn reset() -> Result<()> {
        let config_path = get_config_path()?;
        if config_path.exists() {
            std::fs::remove_file(&config_path)?;
        }
        Ok(())
    }

    pub fn display(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "현재 설정:".bright_cyan().bold()));
        output.push_str(&format!("{}\n", "=".repeat(50).dimmed()));

        let key = if self.has_api_key() {
            self.gemini_api_key.as_deref().map(mask_api_key).unwrap_or_default()
        } else {
            "미설정".red().to_string()
        };
        let source = match self.api_key_source {
            ApiKeySource::Environment => "환경 변수",
            ApiKeySource::ConfigFile => "설정 파일",
        };

        output.push_str("API 키:\n");
        output.push_str(&format!("  Gemini: {} ({})\n", key, source.dimmed()));

        output.push_str("\n모델 설정:\n");
        output.push_str(&format!("  Endpoint: {}\n", self.model_preferences.endpoint.yellow()));
        output.push_str(&format!("  언어: {}\n", self.model_preferences.language.yellow()));
        output.push_str(&format!("  Timeout: {}s\n", self.model_preferences.timeout_secs.to_string().yellow()));

        let on_off = |flag: bool| if flag { "켜짐".green() } else { "꺼짐".red() };
        output.push_str("\n출력 설정:\n");
        output.push_str(&format!("  구문 강조: {}\n", on_off(self.output_preferences.syntax_highlighting)));
        output.push_str(&format!("  마크다운 렌더링: {}\n", on_off(self.output_preferences.markdown_rendering)));

        output
    }
}

fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
