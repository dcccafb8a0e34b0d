// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含结果处理管道（CSV、SQLite、媒体下载）、指标说明以及系统浏览器的封装
pub mod browser;
pub mod metrics;
pub mod pipelines;
