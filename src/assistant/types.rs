use serde::{Serialize, Deserialize, Deserializer};
use std::fmt;

/// 전체 리뷰 결과 (정규화된 레코드)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub overall_score: u8,
    pub code_quality: CodeQuality,
    pub issues: Vec<Issue>,
    pub explanation: String,
    pub analogy: String,
    pub practice_tasks: Vec<String>,
    pub fixed_code: String,
    pub key_improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub problem: String,
    pub fix: String,
    pub line_numbers: String,
}

/// 이슈 유형. 알 수 없는 라벨은 `Other`로 보존한다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    Style,
    Bug,
    Security,
    Efficiency,
    Readability,
    Other(String),
}

impl IssueType {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        match label.to_ascii_lowercase().as_str() {
            "style" => Self::Style,
            "bug" => Self::Bug,
            "security" => Self::Security,
            "efficiency" => Self::Efficiency,
            "readability" => Self::Readability,
            _ => Self::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Style => "Style",
            Self::Bug => "Bug",
            Self::Security => "Security",
            Self::Efficiency => "Efficiency",
            Self::Readability => "Readability",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for IssueType {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<IssueType> for String {
    fn from(issue_type: IssueType) -> Self {
        issue_type.as_str().to_string()
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CodeQuality {
    pub fn from_score(score: u8) -> Self {
        match score {
            9.. => Self::Excellent,
            7..=8 => Self::Good,
            4..=6 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "poor" => Some(Self::Poor),
            "fair" => Some(Self::Fair),
            "good" => Some(Self::Good),
            "excellent" => Some(Self::Excellent),
            _ => None,
        }
    }
}

impl fmt::Display for CodeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}

/// 과거 리뷰 한 건. `score` 외 필드는 프롬프트에 그대로 전달된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HistoryEntry {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            extra: serde_json::Map::new(),
        }
    }
}

/// 리뷰 이력 기반 성장 인사이트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRecord {
    pub stats: InsightsStats,
    pub patterns: InsightsPatterns,
    pub recommendations: InsightsRecommendations,
    pub insights: InsightsNarrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsStats {
    pub total_reviews: usize,
    pub average_score: f64,
    pub skills_improved: usize,
    #[serde(deserialize_with = "string_or_number")]
    pub progress: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsPatterns {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recurring_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRecommendations {
    pub immediate_actions: Vec<String>,
    pub learning_goals: Vec<String>,
    pub practice_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsNarrative {
    pub overall_progress: String,
    pub areas_for_improvement: Vec<String>,
    pub encouragement: String,
}

// 모델이 "75%" 대신 75를 돌려주는 경우가 있다
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "progress는 문자열이어야 합니다: {other}"
        ))),
    }
}
