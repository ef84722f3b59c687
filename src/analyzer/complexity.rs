use crate::assistant::types::{Issue, IssueType, Severity};

const HIGH_COMPLEXITY: u32 = 50;
const MEDIUM_COMPLEXITY: u32 = 20;

const BRANCH_KEYWORDS: [&str; 3] = ["if", "for", "while"];
const DEFINITION_KEYWORDS: [&str; 2] = ["def", "class"];

/// 구조화된 분석을 얻지 못했을 때 쓰는 점수와 합성 이슈
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicScore {
    pub score: u8,
    pub issues: Vec<Issue>,
}

/// 라인 단위 복잡도. 키워드는 부분 문자열로 매칭한다.
pub fn calculate_complexity(content: &str) -> u32 {
    content.split('\n').fold(0, |acc, line| {
        if BRANCH_KEYWORDS.iter().any(|k| line.contains(k)) {
            acc + 2
        } else if DEFINITION_KEYWORDS.iter().any(|k| line.contains(k)) {
            acc + 3
        } else {
            acc + 1
        }
    })
}

pub fn heuristic_score(content: &str) -> HeuristicScore {
    let complexity = calculate_complexity(content);

    if complexity > HIGH_COMPLEXITY {
        HeuristicScore {
            score: 3,
            issues: vec![synthetic_issue(
                IssueType::Efficiency,
                Severity::High,
                "High complexity code detected",
                "The code may have performance issues due to high complexity",
                "Consider refactoring the code to reduce complexity",
            )],
        }
    } else if complexity > MEDIUM_COMPLEXITY {
        HeuristicScore {
            score: 5,
            issues: vec![synthetic_issue(
                IssueType::Readability,
                Severity::Medium,
                "Code readability issues detected",
                "The code may be hard to understand due to poor formatting",
                "Review and apply consistent formatting following PEP8 guidelines",
            )],
        }
    } else {
        HeuristicScore {
            score: 7,
            issues: Vec::new(),
        }
    }
}

fn synthetic_issue(
    issue_type: IssueType,
    severity: Severity,
    description: &str,
    problem: &str,
    fix: &str,
) -> Issue {
    Issue {
        issue_type,
        severity,
        description: description.to_string(),
        problem: problem.to_string(),
        fix: fix.to_string(),
        line_numbers: "Multiple lines".to_string(),
    }
}
