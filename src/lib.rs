// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 网页表单到配置覆盖项的转换，以及一次完整搜索的用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置文件和环境变量
pub mod config;

/// 领域模块
///
/// 微博、地区与搜索参数模型，以及日期规范化和关键词读取
pub mod domain;

/// 引擎模块
///
/// 页面下载引擎
pub mod engines;

/// 基础设施模块
///
/// 结果处理管道、指标与系统浏览器
pub mod infrastructure;

/// 表示层模块
///
/// 本地网页前端的路由、处理器和服务器
pub mod presentation;

/// 队列模块
///
/// 搜索请求的调度与去重
pub mod queue;

/// 爬虫模块
///
/// 构建搜索请求并解析结果页
pub mod spider;

/// 工具模块
///
/// 错误类型、重试策略与日志初始化
pub mod utils;

/// 工作器模块
///
/// 驱动下载、解析与结果处理的爬取循环
pub mod workers;
