// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 连接网页表单、配置与爬取流程
pub mod dto;
pub mod use_cases;
