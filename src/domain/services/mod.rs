// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含发布时间规整和关键词文件读取
pub mod date_normalizer;
pub mod keyword_loader;
