use anyhow::Result;
use colored::*;
use crate::config::{Config, ConfigFileStore, CredentialStore, is_configured};

#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Gemini API 키 설정
    SetKey {
        /// API 키
        key: String,
    },
    /// 설정 보기
    Show,
    /// 설정 초기화
    Reset,
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::SetKey { key } => {
            if !is_configured(Some(&key)) {
                anyhow::bail!("유효한 API 키가 아닙니다");
            }
            ConfigFileStore::default_location()?.set(&key)?;
            println!("{}", "Gemini API 키가 설정되었습니다.".green());
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", config.display());
        }
        ConfigAction::Reset => {
            Config::reset()?;
            println!("{}", "설정이 초기화되었습니다.".yellow());
        }
    }
    Ok(())
}
