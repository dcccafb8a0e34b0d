// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::io;

/// 在系统浏览器中打开地址或文件
pub trait ResultOpener: Send + Sync {
    fn open(&self, target: &str) -> io::Result<()>;
}

/// 使用系统默认程序打开
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl ResultOpener for SystemOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        open::that(target)
    }
}

/// 只记录打开请求，用于测试和无界面环境
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl ResultOpener for RecordingOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        self.opened.lock().push(target.to_string());
        Ok(())
    }
}
