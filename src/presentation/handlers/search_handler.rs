// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::search_form::SearchFormDto;
use crate::application::use_cases::run_search::RunSearchUseCase;
use crate::presentation::errors::AppError;
use axum::{
    extract::rejection::FormRejection,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Extension, Form,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tracing::info;

const SEARCH_FORM: &str = include_str!("../assets/search_form.html");
const DONE_MESSAGE: &str = "爬取完成，请关闭此页面。";
/// 响应发出后等待多久再关闭服务器
const SHUTDOWN_DELAY: Duration = Duration::from_millis(500);

/// 网页前端的共享状态
pub struct SearchState {
    use_case: RunSearchUseCase,
    /// 同一时间只运行一次爬取
    running: Mutex<()>,
    shutdown: Arc<Notify>,
}

impl SearchState {
    pub fn new(use_case: RunSearchUseCase, shutdown: Arc<Notify>) -> Self {
        Self {
            use_case,
            running: Mutex::new(()),
            shutdown,
        }
    }
}

/// GET / 返回搜索表单
pub async fn index() -> Html<&'static str> {
    Html(SEARCH_FORM)
}

/// POST /run 按表单运行爬虫，完成后安排关闭服务器
pub async fn run_search(
    Extension(state): Extension<Arc<SearchState>>,
    form: Result<Form<SearchFormDto>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form?;
    let overrides = form.into_overrides()?;
    info!(?overrides, "收到搜索请求");

    let summary = {
        let _guard = state.running.lock().await;
        state.use_case.execute(&overrides).await?
    };
    info!(stored = summary.items_stored, "网页搜索完成");

    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SHUTDOWN_DELAY).await;
        shutdown.notify_one();
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        DONE_MESSAGE,
    ))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
