use anyhow::{Result, Context};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::Cli;

const BIN_NAME: &str = "codesage";

/// 쉘별 설치 위치와 rc 파일에 추가할 줄
struct InstallTarget {
    script_path: PathBuf,
    rc_file: Option<PathBuf>,
    rc_marker: String,
    rc_lines: Vec<String>,
    reload_hint: &'static str,
}

pub fn completion_script(shell: Shell) -> Result<String> {
    let mut cmd = Cli::command();
    let mut script = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut script);
    String::from_utf8(script).context("완성 스크립트 인코딩 실패")
}

pub fn install_completions(shell: Option<Shell>) -> Result<()> {
    let shell = shell.unwrap_or_else(detect_shell);

    println!("{} {}",
        "자동완성 설치 중:".bright_green(),
        format!("{shell:?}").cyan()
    );

    let home = dirs::home_dir().context("홈 디렉토리를 찾을 수 없습니다")?;
    let config_dir = dirs::config_dir().context("설정 디렉토리를 찾을 수 없습니다")?;
    let target = install_target(shell, &home, &config_dir)?;

    if let Some(parent) = target.script_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target.script_path, completion_script(shell)?)
        .with_context(|| format!("완성 스크립트 저장 실패: {}", target.script_path.display()))?;

    if let Some(rc_file) = &target.rc_file {
        append_once(rc_file, &target.rc_marker, &target.rc_lines)?;
    }

    println!("{}", "✓ 자동완성 설치 완료!".green().bold());
    println!("\n다음을 실행하여 적용하세요:");
    println!("  {}", target.reload_hint);

    println!("\n{}", "사용 예시:".yellow());
    println!("  {BIN_NAME} <Tab>           # 사용 가능한 명령어 보기");
    println!("  {BIN_NAME} analyze <Tab>   # analyze 옵션 보기");

    Ok(())
}

fn detect_shell() -> Shell {
    if cfg!(windows) {
        return Shell::PowerShell;
    }

    match std::env::var("SHELL") {
        Ok(shell) if shell.contains("zsh") => Shell::Zsh,
        Ok(shell) if shell.contains("fish") => Shell::Fish,
        _ => Shell::Bash,
    }
}

fn install_target(shell: Shell, home: &Path, config_dir: &Path) -> Result<InstallTarget> {
    let comment = format!("# {BIN_NAME} 자동완성");

    let target = match shell {
        Shell::Bash => {
            let dir = home.join(".local/share/bash-completion/completions");
            let script_path = dir.join(BIN_NAME);
            InstallTarget {
                rc_file: Some(home.join(".bashrc")),
                rc_marker: script_path.display().to_string(),
                rc_lines: vec![
                    comment,
                    format!("[ -f {0} ] && source {0}", script_path.display()),
                ],
                script_path,
                reload_hint: "source ~/.bashrc",
            }
        }
        Shell::Zsh => {
            let dir = home.join(".local/share/zsh/completions");
            InstallTarget {
                script_path: dir.join(format!("_{BIN_NAME}")),
                rc_file: Some(home.join(".zshrc")),
                rc_marker: ".local/share/zsh/completions".to_string(),
                rc_lines: vec![
                    comment,
                    "fpath=(~/.local/share/zsh/completions $fpath)".to_string(),
                    "autoload -Uz compinit && compinit".to_string(),
                ],
                reload_hint: "source ~/.zshrc",
            }
        }
        Shell::Fish => InstallTarget {
            script_path: config_dir.join("fish/completions").join(format!("{BIN_NAME}.fish")),
            rc_file: None,
            rc_marker: String::new(),
            rc_lines: Vec::new(),
            reload_hint: "source ~/.config/fish/config.fish",
        },
        Shell::PowerShell => {
            let script_path = config_dir.join(BIN_NAME).join(format!("{BIN_NAME}-completion.ps1"));
            let import_line = format!(". \"{}\"", script_path.display());
            InstallTarget {
                rc_file: std::env::var("PROFILE").ok().map(PathBuf::from),
                rc_marker: import_line.clone(),
                rc_lines: vec![comment, import_line],
                script_path,
                reload_hint: ". $PROFILE",
            }
        }
        other => anyhow::bail!("지원하지 않는 쉘입니다: {other:?}"),
    };

    Ok(target)
}

/// `marker` 가 이미 있으면 건드리지 않는다.
fn append_once(rc_file: &Path, marker: &str, lines: &[String]) -> Result<()> {
    if rc_file.exists() {
        let content = std::fs::read_to_string(rc_file)?;
        if content.contains(marker) {
            return Ok(());
        }
    } else if let Some(parent) = rc_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(rc_file)
        .with_context(|| format!("rc 파일 열기 실패: {}", rc_file.display()))?;

    writeln!(file)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
