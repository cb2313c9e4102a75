//! Yarrow CLI - binary entry point.
//!
//! ```text
//! main() -> parse args -> load config -> Session::new()
//!                                            |
//!                                            v
//!                      check connection -> divine(question)
//! ```
//!
//! The reading streams from a local Ollama server; while it generates, the
//! terminal replays the stalk-counting ceremony that produced the hexagram.

mod markdown;
mod narrator;
mod session;

use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use yarrow_config::YarrowConfig;

use crate::session::Session;

const BANNER_WIDTH: usize = 60;

const USAGE: &str = "用法: yarrow [选项] [问题...]

选项:
  -q, --quick        跳过起卦动画，直接输出结果
      --model NAME   覆盖配置中的模型
      --url URL      覆盖配置中的Ollama地址
  -h, --help         显示本帮助

不带问题运行时会交互式询问。";

#[derive(Debug, Default)]
struct CliArgs {
    quick: bool,
    model: Option<String>,
    base_url: Option<String>,
    question: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<CliArgs>, String> {
    let mut parsed = CliArgs::default();
    let mut question_words: Vec<String> = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-q" | "--quick" => parsed.quick = true,
            "--model" => {
                parsed.model = Some(args.next().ok_or("--model 需要一个参数")?);
            }
            "--url" => {
                parsed.base_url = Some(args.next().ok_or("--url 需要一个参数")?);
            }
            other if other.starts_with('-') => {
                return Err(format!("未知选项: {other}"));
            }
            _ => question_words.push(arg),
        }
    }

    if !question_words.is_empty() {
        parsed.question = Some(question_words.join(" "));
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "session failed");
            eprintln!("错误: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let mut config = YarrowConfig::load().context("reading configuration")?;
    if let Some(model) = args.model {
        config.ollama.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.ollama.base_url = base_url;
    }

    let session = Session::new(config, !args.quick)?;

    if !args.quick {
        print_banner();
    }

    if !session.check_connection().await {
        eprintln!("错误: 无法连接到Ollama服务");
        eprintln!("请确保:");
        eprintln!("  1. Ollama已安装并运行");
        eprintln!("  2. 服务地址正确 (当前: {})", session.base_url());
        eprintln!("  3. 已下载模型 (如: ollama run {})", session.model());
        anyhow::bail!("Ollama不可用");
    }

    if !args.quick {
        println!("✓ 已连接到Ollama服务");
        println!("✓ 使用模型: {}", session.model());
    }

    let question = match args.question {
        Some(question) => question,
        None if args.quick => String::new(),
        None => ask_question()?,
    };

    if !args.quick {
        println!();
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("开始起卦...");
        println!("{}", "=".repeat(BANNER_WIDTH));
    }

    session.divine(&question).await
}

fn print_banner() {
    println!();
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("           周 易 占 卜 系 统");
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("基于大衍筮法 + Ollama AI 解卦");
    println!();
}

fn ask_question() -> Result<String> {
    print!("请输入您的占卜问题（直接回车则不指定问题）: ");
    std::io::stdout().flush().context("flushing prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("reading question")?;
    Ok(line.trim().to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the
    // narration by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let candidates = log_file_candidates();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.yarrow/logs/yarrow.log
    if let Some(config_dir) = YarrowConfig::dir() {
        candidates.push(config_dir.join("logs").join("yarrow.log"));
    }

    // Fallback: system temp dir
    candidates.push(std::env::temp_dir().join("yarrow.log"));

    candidates
}
