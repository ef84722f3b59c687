use anyhow::{Result, anyhow};
use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::*;
use termimad::crossterm::style::Color as CrosstermColor;
use std::io::Write;

use crate::config::OutputPreferences;

const THEME: &str = "base16-ocean.dark";

/// 모델 응답 텍스트 조각
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code { language: String, code: String },
}

/// ``` 펜스를 기준으로 텍스트와 코드 블록을 나눈다. 닫히지 않은 블록도 코드로 본다.
pub fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut in_code_block = false;
    let mut language = String::new();
    let mut buffer = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("```") {
            if in_code_block {
                segments.push(Segment::Code {
                    language: std::mem::take(&mut language),
                    code: std::mem::take(&mut buffer),
                });
                in_code_block = false;
            } else {
                if !buffer.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut buffer)));
                }
                language = rest.trim().to_string();
                in_code_block = true;
            }
        } else {
            buffer.push_str(line);
            buffer.push('\n');
        }
    }

    if !buffer.is_empty() {
        if in_code_block {
            segments.push(Segment::Code { language, code: buffer });
        } else {
            segments.push(Segment::Text(buffer));
        }
    }

    segments
}

pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    mad_skin: MadSkin,
    syntax_highlighting: bool,
    markdown_rendering: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(&OutputPreferences::default())
    }
}

impl MarkdownRenderer {
    pub fn new(prefs: &OutputPreferences) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let mut mad_skin = MadSkin::default();

        // 마크다운 스타일 커스터마이징
        mad_skin.set_headers_fg(CrosstermColor::Cyan);
        mad_skin.bold.set_fg(CrosstermColor::White);
        mad_skin.italic.set_fg(CrosstermColor::Yellow);
        mad_skin.bullet = StyledChar::from_fg_char(CrosstermColor::Green, '•');
        mad_skin.quote_mark = StyledChar::from_fg_char(CrosstermColor::Magenta, '▌');

        Self {
            syntax_set,
            theme_set,
            mad_skin,
            syntax_highlighting: prefs.syntax_highlighting,
            markdown_rendering: prefs.markdown_rendering,
        }
    }

    /// 마크다운 문서 출력. 코드 블록은 구문 강조.
    pub fn render(&self, text: &str) -> Result<()> {
        if !self.markdown_rendering {
            println!("{text}");
            return Ok(());
        }

        for segment in split_segments(text) {
            match segment {
                Segment::Text(body) => self.mad_skin.print_text(&body),
                Segment::Code { language, code } => self.print_code(&code, &language)?,
            }
        }
        std::io::stdout().flush()?;
        Ok(())
    }

    pub fn print_code(&self, code: &str, language: &str) -> Result<()> {
        if !self.syntax_highlighting {
            println!("{code}");
            return Ok(());
        }

        let syntax = self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.themes.get(THEME)
            .ok_or_else(|| anyhow!("테마를 찾을 수 없습니다: {THEME}"))?;
        let mut highlighter = HighlightLines::new(syntax, theme);

        println!("\n{}", format!("─── {} ───", language).dimmed());

        for line in code.lines() {
            let ranges = highlighter.highlight_line(line, &self.syntax_set)?;
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            println!("{}\x1b[0m", escaped);
        }

        println!("{}", "─────────".dimmed());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_text_and_code() {
        let text = "intro\n```python\nx = 1\n```\noutro";
        assert_eq!(
            split_segments(text),
            vec![
                Segment::Text("intro\n".into()),
                Segment::Code { language: "python".into(), code: "x = 1\n".into() },
                Segment::Text("outro\n".into()),
            ]
        );
    }

    #[test]
    fn unterminated_fence_is_code() {
        let segments = split_segments("```rust\nfn main() {}");
        assert_eq!(
            segments,
            vec![Segment::Code { language: "rust".into(), code: "fn main() {}\n".into() }]
        );
    }
}
