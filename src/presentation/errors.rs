// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::errors::{CrawlError, SearchError};

/// 应用错误类型
///
/// 表单解析失败沿用其状态码，搜索条件错误返回 400，其余返回 500
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(rejection) = self.0.downcast_ref::<FormRejection>() {
            return rejection.status();
        }
        let is_bad_request = self.0.downcast_ref::<SearchError>().is_some()
            || matches!(
                self.0.downcast_ref::<CrawlError>(),
                Some(CrawlError::Search(_))
            );
        if is_bad_request {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();
        if status.is_server_error() {
            tracing::error!(error = %error_message, "请求处理失败");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
