use regex::Regex;
use tracing::warn;

/// 응답에서 `language` 코드 블록을 꺼낸다.
///
/// 블록이 없거나 원본 길이의 절반보다 짧으면 `basic_fix` 결과를 돌려준다.
pub fn extract_fixed_code(
    response: &str,
    original: &str,
    issue_count: usize,
    language: &str,
) -> String {
    match extract_code_block(response, language) {
        Some(code) if code.len() * 2 >= original.len() && !code.is_empty() => code,
        Some(code) => {
            warn!(
                extracted = code.len(),
                original = original.len(),
                "추출된 코드가 너무 짧음, 기본 수정 적용"
            );
            basic_fix(original, issue_count, language)
        }
        None => {
            warn!(language, "응답에 코드 블록 없음, 기본 수정 적용");
            basic_fix(original, issue_count, language)
        }
    }
}

/// 첫 번째 ```language 블록의 내용 (trim 적용)
pub fn extract_code_block(text: &str, language: &str) -> Option<String> {
    let pattern = format!(r"```{}\r?\n([\s\S]*?)\r?\n```", regex::escape(language));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// 모델 없이 적용하는 최소한의 정리
pub fn basic_fix(code: &str, issue_count: usize, language: &str) -> String {
    let detabbed = code.replace('\t', "    ");

    let stripped = detabbed
        .split('\n')
        .map(|line| {
            let line = line.trim_end();
            line.strip_suffix(';').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n");

    let collapsed = collapse_blank_lines(&stripped);

    let marker = comment_marker(language);
    format!(
        "{marker} Improved by CodeSage AI\n\
         {marker} Issues addressed: {issue_count}\n\
         {marker} Key improvements: PEP8 compliance, readability, and best practices\n\n\
         {collapsed}"
    )
}

fn collapse_blank_lines(text: &str) -> String {
    match Regex::new(r"\n{3,}") {
        Ok(re) => re.replace_all(text, "\n\n").into_owned(),
        Err(_) => text.to_string(),
    }
}

pub fn comment_marker(language: &str) -> &'static str {
    match language.to_ascii_lowercase().as_str() {
        "python" | "py" | "ruby" | "rb" | "bash" | "sh" | "shell" | "r" | "perl" | "yaml"
        | "toml" => "#",
        "sql" | "lua" | "haskell" => "--",
        _ => "//",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ORIGINAL: &str = "def add(a,b):\n\treturn a+b;\n";

    #[test]
    fn returns_trimmed_block_when_long_enough() {
        let response = "Here is the fix:\n```python\n\ndef add(a, b):\n    return a + b\n\n```\nDone.";
        assert_eq!(
            extract_fixed_code(response, ORIGINAL, 1, "python"),
            "def add(a, b):\n    return a + b"
        );
    }

    #[test]
    fn takes_first_matching_block() {
        let response = "```python\nfirst_block = True\n```\n```python\nsecond_block = True\n```";
        assert_eq!(
            extract_code_block(response, "python").as_deref(),
            Some("first_block = True")
        );
    }

    #[test]
    fn ignores_blocks_for_other_languages() {
        let response = "```rust\nfn add(a: i32, b: i32) -> i32 { a + b }\n```";
        assert_eq!(extract_code_block(response, "python"), None);
    }

    #[test]
    fn missing_block_uses_basic_fix() {
        let result = extract_fixed_code("I fixed it for you!", ORIGINAL, 2, "python");
        assert_eq!(result, basic_fix(ORIGINAL, 2, "python"));
        assert!(!result.is_empty());
    }

    #[test]
    fn short_block_uses_basic_fix() {
        let original = "x = 1\n".repeat(20);
        let response = "```python\nx = 1\n```";
        assert_eq!(
            extract_fixed_code(response, &original, 0, "python"),
            basic_fix(&original, 0, "python")
        );
    }

    #[test]
    fn basic_fix_cleans_lines_and_adds_header() {
        let code = "x = 1;  \n\tprint(x);\n\n\n\n\ny = 2\t";
        let fixed = basic_fix(code, 3, "python");

        assert_eq!(
            fixed,
            "# Improved by CodeSage AI\n\
             # Issues addressed: 3\n\
             # Key improvements: PEP8 compliance, readability, and best practices\n\n\
             x = 1\n    print(x)\n\ny = 2"
        );
    }

    #[test]
    fn basic_fix_never_returns_empty() {
        let fixed = basic_fix("", 0, "python");
        assert!(fixed.starts_with("# Improved by CodeSage AI"));
    }

    #[test]
    fn header_uses_language_comment_marker() {
        assert!(basic_fix("let x = 1;", 1, "javascript").starts_with("// Improved"));
        assert!(basic_fix("x = 1", 1, "python").starts_with("# Improved"));
    }
}
