use anyhow::{Result, Context};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::{
    assistant::{AnalysisRecord, CodeSage, HistoryEntry, Issue},
    config::Config,
    renderer::MarkdownRenderer,
};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_source(path: &str) -> Result<String> {
    if !Path::new(path).is_file() {
        anyhow::bail!("경로가 파일이 아닙니다: {}", path);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("파일 읽기 실패: {}", path))
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("파일 읽기 실패: {}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("JSON 파싱 실패: {}", path))
}

fn print_structured<T: Serialize>(value: &T, format: &str) -> Result<bool> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(value)?),
        "yaml" => println!("{}", serde_yaml::to_string(value)?),
        "markdown" => return Ok(false),
        _ => anyhow::bail!("지원하지 않는 형식: {}", format),
    }
    Ok(true)
}

async fn analysis_for(sage: &CodeSage, code: &str, analysis: Option<&str>) -> Result<AnalysisRecord> {
    if let Some(path) = analysis {
        return read_json(path);
    }

    let pb = spinner("코드 분석 중...");
    let record = sage.analyze(code).await;
    pb.finish_and_clear();
    Ok(record?)
}

pub async fn handle_analyze(path: &str, format: &str, config: &Config) -> Result<()> {
    let code = read_source(path)?;
    let sage = CodeSage::from_config(config)?;

    let pb = spinner(&format!("분석 중: {}", path));
    let record = sage.analyze(&code).await;
    pb.finish_and_clear();
    let record = record?;

    if !print_structured(&record, format)? {
        let renderer = MarkdownRenderer::new(&config.output_preferences);
        renderer.render(&record.format_markdown(sage.language()))?;
        record.print_summary();
    }

    Ok(())
}

pub async fn handle_explain(analysis_path: &str, issue: Option<usize>, config: &Config) -> Result<()> {
    let record: AnalysisRecord = read_json(analysis_path)?;

    let targets: Vec<(usize, &Issue)> = match issue {
        Some(n) => {
            let found = n.checked_sub(1).and_then(|i| record.issues.get(i))
                .with_context(|| format!("이슈 번호가 범위를 벗어났습니다: {} (총 {}개)", n, record.issues.len()))?;
            vec![(n, found)]
        }
        None => record.issues.iter().enumerate().map(|(i, issue)| (i + 1, issue)).collect(),
    };

    if targets.is_empty() {
        println!("{}", "설명할 이슈가 없습니다.".green());
        return Ok(());
    }

    let sage = CodeSage::from_config(config)?;
    let renderer = MarkdownRenderer::new(&config.output_preferences);

    for (n, issue) in targets {
        let pb = spinner(&format!("이슈 {} 설명 생성 중...", n));
        let text = sage.explain(issue).await;
        pb.finish_and_clear();

        println!("\n{} {} - {}", format!("#{}", n).bright_cyan().bold(), issue.issue_type, issue.description);
        renderer.render(&text?)?;
    }

    Ok(())
}

pub async fn handle_suggest(path: &str, analysis: Option<&str>, config: &Config) -> Result<()> {
    let code = read_source(path)?;
    let sage = CodeSage::from_config(config)?;
    let record = analysis_for(&sage, &code, analysis).await?;

    let pb = spinner("학습 계획 생성 중...");
    let plan = sage.suggest_improvements(&code, &record).await;
    pb.finish_and_clear();

    MarkdownRenderer::new(&config.output_preferences).render(&plan?)?;
    Ok(())
}

pub async fn handle_fix(
    path: &str,
    analysis: Option<&str>,
    output: Option<&str>,
    config: &Config,
) -> Result<()> {
    let code = read_source(path)?;
    let sage = CodeSage::from_config(config)?;
    let record = analysis_for(&sage, &code, analysis).await?;

    let pb = spinner("수정 코드 생성 중...");
    let fixed = sage.generate_fixed_code(&code, &record.issues).await;
    pb.finish_and_clear();
    let fixed = fixed?;

    match output {
        Some(out) => {
            std::fs::write(out, &fixed)
                .with_context(|| format!("파일 저장 실패: {}", out))?;
            println!("{} {}", "수정 코드 저장 완료:".green(), out);
        }
        None => {
            MarkdownRenderer::new(&config.output_preferences).print_code(&fixed, sage.language())?;
        }
    }

    Ok(())
}

pub async fn handle_insights(history_path: &str, format: &str, config: &Config) -> Result<()> {
    let history: Vec<HistoryEntry> = read_json(history_path)?;
    let sage = CodeSage::from_config(config)?;

    let pb = spinner(&format!("리뷰 {}건 분석 중...", history.len()));
    let insights = sage.synthesize_insights(&history).await;
    pb.finish_and_clear();
    let insights = insights?;

    if !print_structured(&insights, format)? {
        MarkdownRenderer::new(&config.output_preferences).render(&insights.format_markdown())?;
    }

    Ok(())
}

pub async fn handle_mentor(history_path: &str, config: &Config) -> Result<()> {
    let history: Vec<HistoryEntry> = read_json(history_path)?;
    let sage = CodeSage::from_config(config)?;

    let pb = spinner("멘토링 조언 생성 중...");
    let advice = sage.mentorship(&history).await;
    pb.finish_and_clear();

    MarkdownRenderer::new(&config.output_preferences).render(&advice?)?;
    Ok(())
}
