//! 의도별 요청 생성
//!
//! 지시문은 `templates/` 의 리소스를 minijinja로 렌더링한다. 입력은 변경하지 않는다.

use minijinja::{context, Environment};

use crate::api::{GenerateRequest, GenerationConfig};
use crate::assistant::types::{AnalysisRecord, HistoryEntry, Issue};
use crate::error::{Result, SageError};

const REVIEW_TEMPLATE: &str = include_str!("templates/review.txt");
const EXPLAIN_TEMPLATE: &str = include_str!("templates/explain.txt");
const IMPROVE_TEMPLATE: &str = include_str!("templates/improve.txt");
const FIX_CODE_TEMPLATE: &str = include_str!("templates/fix_code.txt");
const INSIGHTS_TEMPLATE: &str = include_str!("templates/insights.txt");
const MENTORSHIP_TEMPLATE: &str = include_str!("templates/mentorship.txt");

const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Review,
    Explain,
    Improve,
    FixCode,
    Insights,
    Mentorship,
}

impl Intent {
    // 평가/코드 생성은 낮게, 설명/동기부여는 높게
    pub fn generation_config(self) -> GenerationConfig {
        let (temperature, max_output_tokens) = match self {
            Self::Review => (0.3, 2048),
            Self::Explain => (0.8, 2048),
            Self::Improve => (0.7, 2048),
            Self::FixCode => (0.3, 4096),
            Self::Insights => (0.7, 2048),
            Self::Mentorship => (0.7, 1024),
        };

        GenerationConfig {
            temperature,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens,
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Review => REVIEW_TEMPLATE,
            Self::Explain => EXPLAIN_TEMPLATE,
            Self::Improve => IMPROVE_TEMPLATE,
            Self::FixCode => FIX_CODE_TEMPLATE,
            Self::Insights => INSIGHTS_TEMPLATE,
            Self::Mentorship => MENTORSHIP_TEMPLATE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Explain => "explain",
            Self::Improve => "improve",
            Self::FixCode => "fix_code",
            Self::Insights => "insights",
            Self::Mentorship => "mentorship",
        }
    }
}

pub struct PromptBuilder {
    env: Environment<'static>,
    language: String,
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            env: Environment::new(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn review(&self, code: &str) -> Result<GenerateRequest> {
        self.render(
            Intent::Review,
            context! { code => code, language => &self.language },
        )
    }

    pub fn explain(&self, issue: &Issue) -> Result<GenerateRequest> {
        self.render(Intent::Explain, context! { issue => issue })
    }

    pub fn improve(&self, code: &str, analysis: &AnalysisRecord) -> Result<GenerateRequest> {
        let issue_types = analysis
            .issues
            .iter()
            .map(|issue| issue.issue_type.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        self.render(
            Intent::Improve,
            context! {
                code => code,
                language => &self.language,
                analysis => analysis,
                issue_types => issue_types,
                issues_text => format_issue_list(&analysis.issues),
            },
        )
    }

    pub fn fix_code(&self, code: &str, issues: &[Issue]) -> Result<GenerateRequest> {
        self.render(
            Intent::FixCode,
            context! {
                code => code,
                language => &self.language,
                issues_text => format_issue_list(issues),
            },
        )
    }

    pub fn insights(&self, history: &[HistoryEntry]) -> Result<GenerateRequest> {
        self.render(
            Intent::Insights,
            context! { history_json => history_json(history)? },
        )
    }

    pub fn mentorship(&self, history: &[HistoryEntry]) -> Result<GenerateRequest> {
        self.render(
            Intent::Mentorship,
            context! { history_json => history_json(history)? },
        )
    }

    fn render(&self, intent: Intent, ctx: minijinja::Value) -> Result<GenerateRequest> {
        let prompt = self.env.render_str(intent.template(), ctx)?;
        Ok(GenerateRequest::new(prompt, intent.generation_config()))
    }
}

/// "• Type (Severity): description" 형식의 이슈 목록
pub fn format_issue_list(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| {
            format!(
                "• {} ({}): {}\n  Problem: {}\n  Fix: {}",
                issue.issue_type, issue.severity, issue.description, issue.problem, issue.fix
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn history_json(history: &[HistoryEntry]) -> Result<String> {
    serde_json::to_string_pretty(history)
        .map_err(|e| SageError::Transport(format!("이력 직렬화 실패: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::types::{CodeQuality, IssueType, Severity};
    use pretty_assertions::assert_eq;

    fn issue(issue_type: IssueType, severity: Severity) -> Issue {
        Issue {
            issue_type,
            severity,
            description: "uses a global".to_string(),
            problem: "hidden state".to_string(),
            fix: "pass it in".to_string(),
            line_numbers: "4".to_string(),
        }
    }

    fn analysis() -> AnalysisRecord {
        AnalysisRecord {
            overall_score: 6,
            code_quality: CodeQuality::Fair,
            issues: vec![
                issue(IssueType::Style, Severity::Low),
                issue(IssueType::Bug, Severity::High),
            ],
            explanation: String::new(),
            analogy: String::new(),
            practice_tasks: Vec::new(),
            fixed_code: String::new(),
            key_improvements: Vec::new(),
        }
    }

    #[test]
    fn temperatures_follow_intent() {
        assert_eq!(Intent::Review.generation_config().temperature, 0.3);
        assert_eq!(Intent::FixCode.generation_config().temperature, 0.3);
        assert_eq!(Intent::Explain.generation_config().temperature, 0.8);
        assert_eq!(Intent::Improve.generation_config().temperature, 0.7);
        assert_eq!(Intent::Insights.generation_config().temperature, 0.7);
        assert_eq!(Intent::FixCode.generation_config().max_output_tokens, 4096);
        assert_eq!(Intent::Mentorship.generation_config().max_output_tokens, 1024);
        assert_eq!(Intent::Review.generation_config().top_k, 40);
    }

    #[test]
    fn review_prompt_embeds_code_in_language_fence() {
        let builder = PromptBuilder::new("python");
        let request = builder.review("print('hello')").unwrap();

        let prompt = request.prompt();
        assert!(prompt.contains("```python\nprint('hello')\n```"), "{prompt}");
        assert!(prompt.contains("expert Python code reviewer"));
        assert!(prompt.contains("\"overallScore\": number between 1-10"));
        assert_eq!(request.generation_config, Intent::Review.generation_config());
    }

    #[test]
    fn template_syntax_in_code_is_not_evaluated() {
        let builder = PromptBuilder::new("python");
        let request = builder.review("x = '{{ not_a_var }}'").unwrap();
        assert!(request.prompt().contains("x = '{{ not_a_var }}'"));
    }

    #[test]
    fn explain_prompt_lists_issue_fields() {
        let builder = PromptBuilder::new("python");
        let request = builder.explain(&issue(IssueType::Security, Severity::Critical)).unwrap();

        let prompt = request.prompt();
        assert!(prompt.contains("• Issue Type: Security"));
        assert!(prompt.contains("• Description: uses a global"));
        assert!(prompt.contains("• Solution: pass it in"));
    }

    #[test]
    fn improve_prompt_summarizes_analysis() {
        let builder = PromptBuilder::new("python");
        let record = analysis();
        let request = builder.improve("x = 1", &record).unwrap();

        let prompt = request.prompt();
        assert!(prompt.contains("• Overall Score: 6/10"));
        assert!(prompt.contains("• Code Quality: Fair"));
        assert!(prompt.contains("• Issues Found: 2"));
        assert!(prompt.contains("• Key Areas for Improvement: Style, Bug"));
        assert!(prompt.contains("• Bug (High): uses a global"));
        // 입력 레코드는 그대로
        assert_eq!(record, analysis());
    }

    #[test]
    fn issue_list_format() {
        let text = format_issue_list(&[issue(IssueType::Bug, Severity::High)]);
        assert_eq!(
            text,
            "• Bug (High): uses a global\n  Problem: hidden state\n  Fix: pass it in"
        );
    }

    #[test]
    fn insights_prompt_carries_history_json() {
        let builder = PromptBuilder::new("python");
        let mut entry = HistoryEntry::new(7.0);
        entry.extra.insert("language".into(), "python".into());

        let request = builder.insights(&[entry]).unwrap();
        assert!(request.prompt().contains("\"score\": 7.0"));
        assert!(request.prompt().contains("\"language\": \"python\""));
    }
}
