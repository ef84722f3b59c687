use serde::{Serialize, Deserialize};

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub api_key_source: ApiKeySource,
    pub model_preferences: ModelPreferences,
    pub output_preferences: OutputPreferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeySource {
    #[default]
    Environment,
    ConfigFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPreferences {
    pub endpoint: String,
    pub language: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    pub syntax_highlighting: bool,
    pub markdown_rendering: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            api_key_source: ApiKeySource::Environment,
            model_preferences: ModelPreferences::default(),
            output_preferences: OutputPreferences::default(),
        }
    }
}

impl Default for ModelPreferences {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "python".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            syntax_highlighting: true,
            markdown_rendering: true,
        }
    }
}
