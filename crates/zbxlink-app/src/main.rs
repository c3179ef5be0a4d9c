//! # zbxlink
//!
//! 모니터링 서버 CLI.
//! 트래퍼 프로토콜로 메트릭을 보내거나 JSON-RPC API 메서드를 호출한다.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zbxlink_core::config_manager::ConfigManager;

use crate::commands::{CallArgs, SendArgs};

/// 모니터링 서버 JSON-RPC / 트래퍼 클라이언트
#[derive(Parser, Debug)]
#[command(name = "zbxlink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 웹 프론트엔드 URL (설정 파일의 api.url 대체)
    #[arg(long, short = 'u', global = true)]
    url: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 트래퍼 프로토콜로 메트릭 하나 전송
    Send(SendArgs),
    /// JSON-RPC 메서드 호출 (예: `host.get`)
    Call(CallArgs),
    /// 서버 API 버전 조회
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "zbxlink={},zbxlink_core={},zbxlink_network={}",
        args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let manager = ConfigManager::load(args.config.as_deref())?;
    if let Some(path) = manager.config_path() {
        debug!("설정 파일: {}", path.display());
    }

    let mut config = manager.get().clone();
    if let Some(url) = args.url {
        config.api.url = url;
    }

    match args.command {
        Command::Send(send) => {
            let result = commands::run_send(&config.sender, &send).await?;
            info!("전송 결과: {result}");
            println!("{result}");
        }
        Command::Call(call) => {
            let result = commands::run_call(&config.api, &call).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Version => {
            let version = commands::run_version(&config.api).await?;
            println!("{version}");
        }
    }

    Ok(())
}
