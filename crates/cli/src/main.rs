//! # Sensor Merge CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 双数据源读取、转换、合并与输出
//! - 运行摘要

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    observability::init_with_config(logging_config(&cli))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sensor merge CLI starting"
    );

    // Execute command
    let result = match cli.resolved_command() {
        Commands::Run(args) => run_pipeline(&args).await,
        Commands::Validate(args) => run_validate(&args),
        Commands::Info(args) => run_info(&args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
    }

    result
}

/// Map CLI options onto the observability configuration
fn logging_config(cli: &Cli) -> ObservabilityConfig {
    let (level, respect_env) = if cli.quiet {
        ("warn", false)
    } else {
        match cli.verbose {
            0 => ("info", true),
            1 => ("debug", true),
            _ => ("trace", true),
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: level.to_string(),
        respect_env,
    }
}
