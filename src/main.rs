use clap::{CommandFactory, Parser};
use clap_complete::{generate, Generator};
use anyhow::Result;
use std::io;
use tracing_subscriber::EnvFilter;
use codesage::{
    config::Config,
    cli::{Cli, Commands},
    handlers::{
        handle_analyze, handle_explain, handle_suggest, handle_fix,
        handle_insights, handle_mentor, handle_config, install_completions,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일 로드
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CODESAGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // 설정이 필요 없는 명령
    match cli.command {
        Commands::Config { action } => return handle_config(action),
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            return Ok(());
        }
        Commands::Install { shell } => return install_completions(shell),
        command => run(command).await,
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Analyze { file, format } => {
            handle_analyze(&file, &format, &config).await?;
        }
        Commands::Explain { analysis, issue } => {
            handle_explain(&analysis, issue, &config).await?;
        }
        Commands::Suggest { file, analysis } => {
            handle_suggest(&file, analysis.as_deref(), &config).await?;
        }
        Commands::Fix { file, analysis, output } => {
            handle_fix(&file, analysis.as_deref(), output.as_deref(), &config).await?;
        }
        Commands::Insights { history, format } => {
            handle_insights(&history, &format, &config).await?;
        }
        Commands::Mentor { history } => {
            handle_mentor(&history, &config).await?;
        }
        Commands::Config { .. } | Commands::Completion { .. } | Commands::Install { .. } => {}
    }

    Ok(())
}

pub fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
