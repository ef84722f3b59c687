use crate::assistant::types::{AnalysisRecord, InsightsRecord, Severity};
use colored::*;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

fn push_list(output: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("## {}\n\n", title));
    for item in items {
        output.push_str(&format!("- {}\n", item));
    }
    output.push('\n');
}

impl AnalysisRecord {
    pub fn format_markdown(&self, language: &str) -> String {
        let mut output = String::new();

        output.push_str("# 코드 리뷰 결과\n\n");
        output.push_str(&format!("**전체 점수**: {}/10 ({})\n\n", self.overall_score, self.code_quality));

        if !self.issues.is_empty() {
            output.push_str("## 🔍 발견된 문제\n\n");
            for (i, issue) in self.issues.iter().enumerate() {
                output.push_str(&format!("### {}. {} {} - {}\n\n",
                    i + 1, severity_icon(issue.severity), issue.severity, issue.issue_type));
                output.push_str(&format!("**위치**: {}\n\n", issue.line_numbers));
                output.push_str(&format!("{}\n\n", issue.description));
                output.push_str(&format!("**문제**: {}\n\n", issue.problem));
                output.push_str(&format!("**제안**: {}\n\n", issue.fix));
            }
        }

        output.push_str(&format!("## 📖 설명\n\n{}\n\n", self.explanation));
        output.push_str(&format!("## 🧩 비유\n\n{}\n\n", self.analogy));

        push_list(&mut output, "📝 연습 과제", &self.practice_tasks);
        push_list(&mut output, "💡 핵심 개선점", &self.key_improvements);

        if !self.fixed_code.is_empty() {
            output.push_str(&format!("## ✨ 개선된 코드\n\n```{}\n{}\n```\n", language, self.fixed_code));
        }

        output
    }

    pub fn print_summary(&self) {
        println!("\n{}", "코드 리뷰 요약".bright_cyan().bold());
        println!("{}", "=".repeat(50).dimmed());

        let score_color = if self.overall_score >= 8 {
            self.overall_score.to_string().green()
        } else if self.overall_score >= 5 {
            self.overall_score.to_string().yellow()
        } else {
            self.overall_score.to_string().red()
        };

        println!("전체 점수: {}/10 ({})", score_color, self.code_quality);

        let count = |severity: Severity| self.issues.iter().filter(|i| i.severity == severity).count();
        let critical_count = count(Severity::Critical);
        let high_count = count(Severity::High);

        if critical_count > 0 {
            println!("치명적 문제: {}", critical_count.to_string().red().bold());
        }
        if high_count > 0 {
            println!("높은 우선순위 문제: {}", high_count.to_string().yellow());
        }

        println!("전체 문제: {}", self.issues.len());
        println!("연습 과제: {}", self.practice_tasks.len());
    }
}

impl InsightsRecord {
    pub fn format_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# 학습 인사이트\n\n");
        output.push_str(&format!("- 리뷰 횟수: {}\n", self.stats.total_reviews));
        output.push_str(&format!("- 평균 점수: {:.1}\n", self.stats.average_score));
        output.push_str(&format!("- 향상된 기술: {}\n", self.stats.skills_improved));
        output.push_str(&format!("- 진행도: {}\n\n", self.stats.progress));

        push_list(&mut output, "👍 강점", &self.patterns.strengths);
        push_list(&mut output, "⚠️ 약점", &self.patterns.weaknesses);
        push_list(&mut output, "🔁 반복되는 문제", &self.patterns.recurring_issues);
        push_list(&mut output, "🎯 당장 할 일", &self.recommendations.immediate_actions);
        push_list(&mut output, "📚 학습 목표", &self.recommendations.learning_goals);
        push_list(&mut output, "📝 연습 제안", &self.recommendations.practice_suggestions);

        output.push_str(&format!("## 📈 전체 진행\n\n{}\n\n", self.insights.overall_progress));
        push_list(&mut output, "🛠 개선 영역", &self.insights.areas_for_improvement);
        output.push_str(&format!("> {}\n", self.insights.encouragement));

        output
    }
}
