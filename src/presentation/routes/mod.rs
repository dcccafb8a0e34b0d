// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::search_handler::{self, SearchState};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建网页前端路由
///
/// 除 GET / 与 POST /run 外的请求一律返回 404
pub fn routes(state: Arc<SearchState>) -> Router {
    Router::new()
        .route(
            "/",
            get(search_handler::index).fallback(search_handler::not_found),
        )
        .route(
            "/run",
            post(search_handler::run_search).fallback(search_handler::not_found),
        )
        .fallback(search_handler::not_found)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
