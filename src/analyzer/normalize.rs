use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::analyzer::complexity::heuristic_score;
use crate::analyzer::severity::infer_severity;
use crate::assistant::types::{AnalysisRecord, CodeQuality, Issue, IssueType, Severity};
use crate::error::{Result, SageError};

const DEFAULT_EXPLANATION: &str = "No explanation provided.";
const DEFAULT_ANALOGY: &str = "No analogy provided.";
const DEFAULT_LINE_NUMBERS: &str = "Unknown";

const FALLBACK_EXPLANATION: &str = "I had trouble analyzing your code in detail, but I can see some areas for improvement. Let me help you understand the main issues.";
const FALLBACK_ANALOGY: &str = "Think of code review like proofreading an essay - sometimes you need to look at it multiple times to catch all the mistakes.";
const FALLBACK_PRACTICE_TASKS: [&str; 3] = [
    "Review Python PEP8 style guidelines",
    "Test your code with different inputs",
    "Add comments to explain your logic",
];
const FALLBACK_KEY_IMPROVEMENTS: [&str; 2] = [
    "Focus on code structure and organization",
    "Add proper error handling",
];

/// 모델 응답을 정규화한다. 실패하면 `raw`에 대한 휴리스틱 폴백을 돌려준다.
pub fn normalize(raw: &str) -> AnalysisRecord {
    match parse_analysis(raw) {
        Ok(record) => record,
        Err(err) => {
            warn!(error = %err, "구조화된 분석 실패, 휴리스틱 폴백 사용");
            debug!(raw_response = raw, "원본 응답");
            fallback_record(raw)
        }
    }
}

/// 첫 `{` 부터 마지막 `}` 까지 잘라낸다.
///
/// 블록이 여러 개면 그 사이 텍스트까지 포함되어 파싱이 실패한다.
pub fn extract_json_block(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

pub fn parse_analysis(raw: &str) -> Result<AnalysisRecord> {
    let block = extract_json_block(raw)
        .ok_or_else(|| malformed("응답에서 JSON 블록을 찾을 수 없음"))?;

    let value: Value = serde_json::from_str(block)
        .map_err(|e| malformed(format!("JSON 파싱 실패: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| malformed("JSON 최상위 값이 객체가 아님"))?;

    let raw_score = obj
        .get("overallScore")
        .and_then(truthy_score)
        .ok_or_else(|| malformed("overallScore 누락"))?;
    let raw_issues = obj
        .get("issues")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("issues 배열 누락"))?;

    let overall_score = clamp_score(raw_score);
    let code_quality = obj
        .get("codeQuality")
        .and_then(Value::as_str)
        .and_then(CodeQuality::parse)
        .unwrap_or_else(|| CodeQuality::from_score(overall_score));

    let issues: Vec<Issue> = raw_issues.iter().filter_map(normalize_issue).collect();
    if issues.len() < raw_issues.len() {
        debug!(
            dropped = raw_issues.len() - issues.len(),
            "필수 필드가 빠진 이슈 제외"
        );
    }

    Ok(AnalysisRecord {
        overall_score,
        code_quality,
        issues,
        explanation: text_or(obj, "explanation", DEFAULT_EXPLANATION),
        analogy: text_or(obj, "analogy", DEFAULT_ANALOGY),
        practice_tasks: string_list(obj, "practiceTasks"),
        fixed_code: text_or(obj, "fixedCode", ""),
        key_improvements: string_list(obj, "keyImprovements"),
    })
}

/// 구조화된 분석을 얻지 못했을 때의 레코드
pub fn fallback_record(text: &str) -> AnalysisRecord {
    let heuristic = heuristic_score(text);

    AnalysisRecord {
        overall_score: heuristic.score,
        code_quality: CodeQuality::Fair,
        issues: heuristic.issues,
        explanation: FALLBACK_EXPLANATION.to_string(),
        analogy: FALLBACK_ANALOGY.to_string(),
        practice_tasks: FALLBACK_PRACTICE_TASKS.iter().map(|s| s.to_string()).collect(),
        fixed_code: text.to_string(),
        key_improvements: FALLBACK_KEY_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
    }
}

fn normalize_issue(value: &Value) -> Option<Issue> {
    let obj = value.as_object()?;

    let issue_type = IssueType::parse(&required_text(obj, "type")?);
    let description = required_text(obj, "description")?;
    let problem = required_text(obj, "problem")?;
    let fix = required_text(obj, "fix")?;

    let severity = obj
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .unwrap_or_else(|| infer_severity(&issue_type, &description));
    let line_numbers = obj
        .get("lineNumbers")
        .and_then(line_numbers_text)
        .unwrap_or_else(|| DEFAULT_LINE_NUMBERS.to_string());

    Some(Issue {
        issue_type,
        severity,
        description,
        problem,
        fix,
        line_numbers,
    })
}

// 0, NaN, 빈 문자열은 거짓으로 본다
fn truthy_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (score.is_finite() && score != 0.0).then_some(score)
}

fn clamp_score(score: f64) -> u8 {
    score.clamp(1.0, 10.0).round() as u8
}

fn required_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn text_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    required_text(obj, key).unwrap_or_else(|| default.to_string())
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// "12-15", 12, [3, 7] 모두 허용
fn line_numbers_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn malformed(message: impl Into<String>) -> SageError {
    SageError::MalformedResponse(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn issue_json(issue_type: &str, description: &str) -> Value {
        json!({
            "type": issue_type,
            "description": description,
            "problem": "it is a problem",
            "fix": "fix it",
        })
    }

    #[test]
    fn prose_wrapped_json_is_clamped_and_backfilled() {
        let raw = "Sure, here you go: {\"overallScore\": 15, \"issues\": []}";
        let record = normalize(raw);

        assert_eq!(record.overall_score, 10);
        assert_eq!(record.code_quality, CodeQuality::Excellent);
        assert!(record.issues.is_empty());
        assert_eq!(record.explanation, DEFAULT_EXPLANATION);
        assert_eq!(record.analogy, DEFAULT_ANALOGY);
        assert!(record.practice_tasks.is_empty());
        assert!(record.key_improvements.is_empty());
    }

    #[test]
    fn code_fences_around_json_are_ignored() {
        let raw = "```json\n{\"overallScore\": 6, \"codeQuality\": \"Good\", \"issues\": []}\n```\nHope this helps!";
        let record = parse_analysis(raw).unwrap();
        assert_eq!(record.overall_score, 6);
        // 모델이 준 값은 점수와 달라도 유지
        assert_eq!(record.code_quality, CodeQuality::Good);
    }

    #[test]
    fn score_is_clamped_into_range() {
        for (raw_score, expected) in [(-4, 1), (500, 10), (1, 1), (10, 10)] {
            let raw = json!({ "overallScore": raw_score, "issues": [] }).to_string();
            assert_eq!(normalize(&raw).overall_score, expected, "score {raw_score}");
        }
    }

    #[test]
    fn zero_score_goes_to_fallback() {
        let raw = r#"{"overallScore": 0, "issues": []}"#;
        assert!(parse_analysis(raw).is_err());

        let record = normalize(raw);
        assert!((1..=10).contains(&record.overall_score));
        assert_eq!(record.code_quality, CodeQuality::Fair);
        assert_eq!(record.fixed_code, raw);
    }

    #[test]
    fn numeric_string_score_is_accepted() {
        let record = parse_analysis(r#"{"overallScore": "8", "issues": []}"#).unwrap();
        assert_eq!(record.overall_score, 8);
        assert_eq!(record.code_quality, CodeQuality::Good);
    }

    #[test]
    fn missing_or_non_array_issues_is_malformed() {
        assert!(matches!(
            parse_analysis(r#"{"overallScore": 5}"#),
            Err(SageError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"overallScore": 5, "issues": "none"}"#),
            Err(SageError::MalformedResponse(_))
        ));
    }

    #[test]
    fn never_fails_on_degenerate_input() {
        let inputs = [
            "",
            "I could not review this code, sorry.",
            "{\"overallScore\": 7, \"issues\": [",
            "} backwards {",
            "{not json at all}",
        ];

        for raw in inputs {
            let record = normalize(raw);
            assert!((1..=10).contains(&record.overall_score), "input {raw:?}");
            assert_eq!(record.practice_tasks.len(), 3);
            assert_eq!(record.key_improvements.len(), 2);
            assert_eq!(record.fixed_code, raw);
        }
    }

    #[test]
    fn incomplete_issues_are_dropped() {
        let raw = json!({
            "overallScore": 5,
            "issues": [
                issue_json("Bug", "wrong result"),
                { "type": "Style", "description": "no fix given", "problem": "p" },
                issue_json("Style", "inconsistent indentation"),
                { "description": "no type", "problem": "p", "fix": "f" },
                issue_json("Security", "hardcoded password"),
            ],
        })
        .to_string();

        let record = parse_analysis(&raw).unwrap();
        assert_eq!(record.issues.len(), 3);
        assert_eq!(record.issues[0].description, "wrong result");
        assert_eq!(record.issues[1].description, "inconsistent indentation");
        assert_eq!(record.issues[2].description, "hardcoded password");
    }

    #[test]
    fn surviving_issues_have_every_field() {
        let raw = json!({
            "overallScore": 4,
            "issues": [issue_json("Readability", "names are short")],
        })
        .to_string();

        let issue = &parse_analysis(&raw).unwrap().issues[0];
        assert_eq!(issue.issue_type, IssueType::Readability);
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.line_numbers, "Unknown");
    }

    #[test]
    fn explicit_severity_is_never_overwritten() {
        let mut issue = issue_json("Style", "this causes a crash");
        issue["severity"] = json!("Low");
        let raw = json!({ "overallScore": 5, "issues": [issue] }).to_string();

        assert_eq!(parse_analysis(&raw).unwrap().issues[0].severity, Severity::Low);
    }

    #[test]
    fn crash_description_backfills_critical() {
        let raw = json!({
            "overallScore": 5,
            "issues": [issue_json("Style", "this causes a crash")],
        })
        .to_string();

        assert_eq!(
            parse_analysis(&raw).unwrap().issues[0].severity,
            Severity::Critical
        );
    }

    #[test]
    fn line_numbers_accept_numbers_and_lists() {
        let mut single = issue_json("Bug", "wrong");
        single["lineNumbers"] = json!(12);
        let mut list = issue_json("Bug", "wrong");
        list["lineNumbers"] = json!([3, "7-9"]);
        let raw = json!({ "overallScore": 5, "issues": [single, list] }).to_string();

        let record = parse_analysis(&raw).unwrap();
        assert_eq!(record.issues[0].line_numbers, "12");
        assert_eq!(record.issues[1].line_numbers, "3, 7-9");
    }

    #[test]
    fn full_response_round_trips_fields() {
        let raw = json!({
            "overallScore": 7,
            "issues": [],
            "explanation": "Mostly fine.",
            "analogy": "Like a tidy desk.",
            "practiceTasks": ["Write tests", 3, "Add docstrings"],
            "fixedCode": "print('hi')",
            "keyImprovements": ["Naming"],
        })
        .to_string();

        let record = parse_analysis(&raw).unwrap();
        assert_eq!(record.explanation, "Mostly fine.");
        assert_eq!(record.analogy, "Like a tidy desk.");
        assert_eq!(record.practice_tasks, vec!["Write tests", "Add docstrings"]);
        assert_eq!(record.fixed_code, "print('hi')");
        assert_eq!(record.key_improvements, vec!["Naming"]);
    }

    #[test]
    fn multiple_blocks_are_not_split() {
        let raw = r#"{"overallScore": 8, "issues": []} and also {"note": 1}"#;
        assert!(parse_analysis(raw).is_err());
    }

    #[test]
    fn fallback_scores_the_given_text() {
        let code = vec!["while True:"; 30].join("\n");
        let record = fallback_record(&code);
        assert_eq!(record.overall_score, 3);
        assert_eq!(record.issues.len(), 1);
        assert_eq!(record.fixed_code, code);
    }
}
