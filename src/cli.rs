use clap::{Parser, Subcommand};
use clap_complete::Shell;
use crate::handlers::config::ConfigAction;

#[derive(Parser)]
#[clap(name = "codesage")]
#[clap(about = "Gemini 기반 코드 리뷰 멘토 CLI", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 코드 분석 및 점수 산정
    Analyze {
        /// 분석할 소스 파일
        file: String,

        /// 출력 형식 (markdown, json, yaml)
        #[clap(short, long, default_value = "markdown")]
        format: String,
    },

    /// 분석 결과의 이슈를 초보자 눈높이로 설명
    Explain {
        /// `analyze --format json` 으로 저장한 분석 결과
        analysis: String,

        /// 설명할 이슈 번호 (1부터, 생략하면 전체)
        #[clap(short, long)]
        issue: Option<usize>,
    },

    /// 개선 학습 계획 생성
    Suggest {
        /// 대상 소스 파일
        file: String,

        /// 저장된 분석 결과 (생략하면 먼저 분석)
        #[clap(short, long)]
        analysis: Option<String>,
    },

    /// 이슈를 반영한 수정 코드 생성
    Fix {
        /// 대상 소스 파일
        file: String,

        /// 저장된 분석 결과 (생략하면 먼저 분석)
        #[clap(short, long)]
        analysis: Option<String>,

        /// 수정 코드를 저장할 경로
        #[clap(short, long)]
        output: Option<String>,
    },

    /// 리뷰 이력에서 학습 인사이트 도출
    Insights {
        /// 리뷰 이력 JSON 배열 파일
        history: String,

        /// 출력 형식 (markdown, json, yaml)
        #[clap(short, long, default_value = "markdown")]
        format: String,
    },

    /// 리뷰 이력 기반 멘토링 조언
    Mentor {
        /// 리뷰 이력 JSON 배열 파일
        history: String,
    },

    /// 설정 관리
    Config {
        #[clap(subcommand)]
        action: ConfigAction,
    },

    /// 쉘 완성 스크립트 생성
    Completion {
        /// 대상 쉘
        #[clap(value_enum)]
        shell: Shell,
    },

    /// 자동완성 설치
    Install {
        /// 대상 쉘 (자동 감지하려면 비워두세요)
        #[clap(value_enum)]
        shell: Option<Shell>,
    },
}
