use tracing::warn;

use crate::analyzer::normalize::extract_json_block;
use crate::assistant::types::{
    HistoryEntry, InsightsNarrative, InsightsPatterns, InsightsRecommendations, InsightsRecord,
    InsightsStats,
};
use crate::error::{Result, SageError};

pub fn parse_insights(raw: &str) -> Result<InsightsRecord> {
    let block = extract_json_block(raw).ok_or_else(|| {
        SageError::MalformedResponse("인사이트 응답에서 JSON 블록을 찾을 수 없음".to_string())
    })?;

    serde_json::from_str(block)
        .map_err(|e| SageError::MalformedResponse(format!("인사이트 스키마 불일치: {e}")))
}

/// 파싱 실패 시 `history` 로부터 인사이트를 만든다.
pub fn normalize_insights(raw: &str, history: &[HistoryEntry]) -> InsightsRecord {
    parse_insights(raw).unwrap_or_else(|err| {
        warn!(error = %err, "인사이트 파싱 실패, 이력 기반 폴백 사용");
        fallback_insights(history)
    })
}

pub fn fallback_insights(history: &[HistoryEntry]) -> InsightsRecord {
    let total_reviews = history.len();
    let average_score = if total_reviews == 0 {
        0.0
    } else {
        history.iter().map(|entry| entry.score).sum::<f64>() / total_reviews as f64
    };

    let skills_improved = (total_reviews as f64 * 0.6).floor() as usize;
    let progress = ((average_score * 10.0).floor() as i64).clamp(0, 95);

    InsightsRecord {
        stats: InsightsStats {
            total_reviews,
            average_score,
            skills_improved,
            progress: format!("{progress}%"),
        },
        patterns: InsightsPatterns {
            strengths: strings(&["Consistent practice", "Code submission"]),
            weaknesses: strings(&["Code style", "Error handling"]),
            recurring_issues: strings(&["Style issues", "Bug fixes"]),
        },
        recommendations: InsightsRecommendations {
            immediate_actions: strings(&[
                "Focus on PEP8 compliance",
                "Add comprehensive error handling",
                "Practice code refactoring",
            ]),
            learning_goals: strings(&[
                "Master Python best practices",
                "Learn advanced debugging techniques",
                "Study design patterns",
            ]),
            practice_suggestions: strings(&[
                "Review and refactor old code",
                "Write unit tests for existing code",
                "Participate in code reviews",
            ]),
        },
        insights: InsightsNarrative {
            overall_progress: format!(
                "You've made good progress with an average score of {average_score:.1}. Keep practicing!"
            ),
            areas_for_improvement: strings(&[
                "Code organization and structure",
                "Error handling and edge cases",
                "Documentation and comments",
            ]),
            encouragement: "Your dedication to improving your code is commendable. Every review brings you closer to mastery!".to_string(),
        },
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
