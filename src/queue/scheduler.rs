// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::spider::request::SearchRequest;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// 请求调度器
///
/// 先进先出，按 URL 去重；已调度过的 URL 不会再次入队
#[derive(Debug, Default)]
pub struct RequestScheduler {
    queue: VecDeque<SearchRequest>,
    seen: HashSet<String>,
}

impl RequestScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队请求
    ///
    /// # 返回值
    ///
    /// 请求是否被接受，重复 URL 返回 false
    pub fn enqueue(&mut self, request: SearchRequest) -> bool {
        if !self.seen.insert(request.url.clone()) {
            trace!(url = %request.url, "重复请求被过滤");
            return false;
        }
        self.queue.push_back(request);
        true
    }

    /// 批量入队，返回被接受的数量
    pub fn enqueue_all(&mut self, requests: impl IntoIterator<Item = SearchRequest>) -> usize {
        requests
            .into_iter()
            .map(|r| self.enqueue(r))
            .filter(|accepted| *accepted)
            .count()
    }

    pub fn next_request(&mut self) -> Option<SearchRequest> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spider::request::SearchLevel;

    fn request(url: &str) -> SearchRequest {
        SearchRequest::new(url, "东南大学", SearchLevel::Page)
    }

    #[test]
    fn test_fifo_order() {
        let mut scheduler = RequestScheduler::new();
        scheduler.enqueue(request("https://s.weibo.com/a"));
        scheduler.enqueue(request("https://s.weibo.com/b"));

        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.next_request().unwrap().url, "https://s.weibo.com/a");
        assert_eq!(scheduler.next_request().unwrap().url, "https://s.weibo.com/b");
        assert!(scheduler.next_request().is_none());
    }

    #[test]
    fn test_duplicate_urls_are_dropped() {
        let mut scheduler = RequestScheduler::new();
        let accepted = scheduler.enqueue_all(vec![
            request("https://s.weibo.com/a"),
            request("https://s.weibo.com/a"),
            request("https://s.weibo.com/b"),
        ]);
        assert_eq!(accepted, 2);

        scheduler.next_request();
        // 出队后仍然记得
        assert!(!scheduler.enqueue(request("https://s.weibo.com/a")));
        assert_eq!(scheduler.len(), 1);
    }
}
