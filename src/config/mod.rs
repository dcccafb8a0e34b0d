// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置，包括本地服务、搜索条件、HTTP下载和结果输出等配置
pub mod settings;
