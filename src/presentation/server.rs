// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::run_search::RunSearchUseCase;
use crate::config::settings::Settings;
use crate::infrastructure::browser::ResultOpener;
use crate::presentation::handlers::search_handler::SearchState;
use crate::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

/// 启动网页前端，直到收到中断信号或一次爬取完成
pub async fn serve(settings: Settings, opener: Arc<dyn ResultOpener>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    let port = listener.local_addr()?.port();
    let url = format!("http://{}:{}", settings.server.host, port);

    let shutdown = Arc::new(Notify::new());
    let open_browser = settings.server.open_browser;
    let use_case = RunSearchUseCase::new(settings, opener.clone());
    let app = routes::routes(Arc::new(SearchState::new(use_case, shutdown.clone())));

    info!("服务器已启动，访问 {} 使用网页填写搜索条件。", url);
    if open_browser && opener.open(&url).is_err() {
        warn!("无法自动打开浏览器，请手动访问 {}", url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("服务器已关闭");
    Ok(())
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "无法监听中断信号");
                // 无法监听时只等待爬取完成
                shutdown.notified().await;
                return;
            }
            info!("收到中断信号，正在关闭服务器...");
        }
        _ = shutdown.notified() => {
            info!("爬取完成，正在关闭服务器");
        }
    }
}
