// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 负责待下载搜索请求的排队与去重
pub mod scheduler;

pub use scheduler::RequestScheduler;
