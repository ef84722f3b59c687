use crate::assistant::types::{IssueType, Severity};

const CRITICAL_KEYWORDS: &[&str] = &[
    "crash", "security", "vulnerable", "injection", "breach", "exploit",
    "syntax error", "runtime error", "fatal", "exception", "error",
    "broken", "fail", "invalid", "undefined", "null", "none",
];

const HIGH_KEYWORDS: &[&str] = &[
    "logical error", "bug", "incorrect", "wrong", "mistake",
    "inefficient", "slow", "performance", "memory leak",
    "missing", "lack", "no error handling", "no validation",
];

const MEDIUM_KEYWORDS: &[&str] = &[
    "should", "recommend", "consider", "improve", "better",
    "inconsistent", "unclear", "confusing", "hard to read",
];

/// 심각도가 빠진 이슈에 대해 설명 키워드, 그다음 유형으로 심각도를 정한다.
pub fn infer_severity(issue_type: &IssueType, description: &str) -> Severity {
    let description = description.to_lowercase();
    let matches_any = |keywords: &[&str]| keywords.iter().any(|k| description.contains(k));

    if matches_any(CRITICAL_KEYWORDS) {
        Severity::Critical
    } else if matches_any(HIGH_KEYWORDS) {
        Severity::High
    } else if matches_any(MEDIUM_KEYWORDS) {
        Severity::Medium
    } else {
        severity_for_type(issue_type)
    }
}

pub fn severity_for_type(issue_type: &IssueType) -> Severity {
    match issue_type {
        IssueType::Security => Severity::Critical,
        IssueType::Bug => Severity::High,
        IssueType::Efficiency => Severity::Medium,
        IssueType::Style | IssueType::Readability => Severity::Low,
        IssueType::Other(_) => Severity::Medium,
    }
}
