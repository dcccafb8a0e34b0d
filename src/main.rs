// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use weibo_search::application::use_cases::run_search;
use weibo_search::config::settings::Settings;
use weibo_search::infrastructure::browser::SystemOpener;
use weibo_search::infrastructure::metrics;
use weibo_search::presentation::server;
use weibo_search::utils::telemetry;

/// 微博关键词搜索爬虫
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 额外加载的配置文件，优先级高于 config 目录
    #[arg(short, long, env = "WEIBO_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default)]
enum Command {
    /// 启动本地网页前端（默认）
    #[default]
    Serve,
    /// 按配置直接爬取，不启动网页前端
    Crawl,
}

/// 主函数
///
/// 初始化日志与配置后，启动网页前端或直接运行爬取
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry();
    metrics::describe_metrics();

    let settings = Settings::load(cli.config.as_deref())?;
    info!("Configuration loaded");

    match cli.command.unwrap_or_default() {
        Command::Serve => server::serve(settings, Arc::new(SystemOpener)).await?,
        Command::Crawl => {
            let summary = run_search::run_crawl(&settings).await?;
            info!(
                requests = summary.requests,
                failed = summary.failed_requests,
                stored = summary.items_stored,
                dropped = summary.items_dropped,
                "爬取完成"
            );
        }
    }

    Ok(())
}
