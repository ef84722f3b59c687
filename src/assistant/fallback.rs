//! 모델 호출이 실패했을 때 돌려주는 고정 텍스트

use crate::assistant::types::IssueType;

pub const LEARNING_PLAN: &str = include_str!("canned/learning_plan.md");

pub const MENTORSHIP_MESSAGE: &str =
    "Keep practicing! Every coder improves with time and experience.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeginnerExplanation {
    pub simple: &'static str,
    pub analogy: &'static str,
    pub tasks: [&'static str; 3],
}

const STYLE: BeginnerExplanation = BeginnerExplanation {
    simple: "Code style is like handwriting rules - when everyone follows the same style, it's easier to read and understand!",
    analogy: "Think of it like organizing your room. When everything has its place, it's easy to find what you need.",
    tasks: [
        "Practice consistent indentation (4 spaces)",
        "Use descriptive variable names",
        "Add comments to explain complex parts",
    ],
};

const BUG: BeginnerExplanation = BeginnerExplanation {
    simple: "A bug is like a mistake in a recipe that makes your food taste wrong. In code, bugs make your program behave incorrectly.",
    analogy: "Imagine building with LEGOs - if you put the wrong piece in the wrong spot, your creation might fall apart!",
    tasks: [
        "Test your code with different inputs",
        "Add error checking for edge cases",
        "Use print statements to debug problems",
    ],
};

const SECURITY: BeginnerExplanation = BeginnerExplanation {
    simple: "Security is like locking your diary - you don't want strangers reading your secrets!",
    analogy: "Think of your code like your house. You wouldn't leave the doors wide open with valuables inside.",
    tasks: [
        "Never hardcode passwords or API keys",
        "Validate user input before using it",
        "Learn about environment variables",
    ],
};

const EFFICIENCY: BeginnerExplanation = BeginnerExplanation {
    simple: "Efficient code is like taking the shortest path home instead of walking in circles.",
    analogy: "Imagine finding a book in a library. You could check every book one by one (slow), or use the catalog system (fast).",
    tasks: [
        "Learn about Big O notation",
        "Practice using appropriate data structures",
        "Avoid nested loops when possible",
    ],
};

const READABILITY: BeginnerExplanation = BeginnerExplanation {
    simple: "Readable code is like writing a clear story that anyone can understand and enjoy.",
    analogy: "Good code is like clear directions - instead of 'go there, then turn', say 'walk 2 blocks north, then turn right'.",
    tasks: [
        "Use meaningful variable and function names",
        "Break long functions into smaller ones",
        "Add comments to explain the 'why' behind your code",
    ],
};

/// 알 수 없는 유형은 Style 항목을 쓴다.
pub fn beginner_explanation(issue_type: &IssueType) -> BeginnerExplanation {
    match issue_type {
        IssueType::Bug => BUG,
        IssueType::Security => SECURITY,
        IssueType::Efficiency => EFFICIENCY,
        IssueType::Readability => READABILITY,
        IssueType::Style | IssueType::Other(_) => STYLE,
    }
}

impl BeginnerExplanation {
    pub fn render(&self) -> String {
        let tasks = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format!("{}. {}", i + 1, task))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "**🎯 Simple Explanation**\n{}\n\n**🔍 Real-World Analogy**\n{}\n\n**📝 Practice Tasks**\n{}",
            self.simple, self.analogy, tasks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_uses_style_entry() {
        assert_eq!(
            beginner_explanation(&IssueType::Other("Naming".into())),
            beginner_explanation(&IssueType::Style)
        );
    }

    #[test]
    fn rendered_text_has_three_tasks() {
        let text = beginner_explanation(&IssueType::Security).render();
        assert!(text.contains("locking your diary"));
        assert!(text.contains("1. Never hardcode passwords or API keys"));
        assert!(text.contains("3. Learn about environment variables"));
    }

    #[test]
    fn learning_plan_is_bundled() {
        assert!(LEARNING_PLAN.starts_with("**🎯 Immediate Actions"));
        assert!(LEARNING_PLAN.contains("Exercise 4"));
    }
}
