// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：微博条目、搜索参数和地区表
/// - 服务（services）：发布时间规整和关键词读取
///
/// 领域层不依赖网络和存储实现。
pub mod models;
pub mod services;
