// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 下载引擎模块
///
/// 定义页面下载特质及基于 reqwest 的实现
pub mod reqwest_engine;
pub mod traits;
