use anyhow::{Result, anyhow};
use crate::config::types::Config;

/// 키 유무는 여기서 보지 않는다. 호출 시점에 CodeSage가 확인한다.
pub fn validate_config(config: &Config) -> Result<()> {
    let prefs = &config.model_preferences;

    if !(prefs.endpoint.starts_with("https://") || prefs.endpoint.starts_with("http://")) {
        return Err(anyhow!("endpoint는 http:// 또는 https:// 로 시작해야 합니다: {}", prefs.endpoint));
    }

    if prefs.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs는 0보다 커야 합니다"));
    }

    if prefs.language.trim().is_empty() {
        return Err(anyhow!("language가 비어 있습니다"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_without_key() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_bad_preferences() {
        let mut config = Config::default();
        config.model_preferences.endpoint = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.model_preferences.timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.model_preferences.language = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
