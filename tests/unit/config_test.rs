// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io::Write;
use weibo_search::config::settings::Settings;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[search]\nkeyword_list = [\"文件关键词\"]\nlimit_result = 7\n\n[http]\nretry_times = 1"
    )
    .unwrap();

    std::env::set_var("WEIBO_SEARCH__HTTP__RETRY_TIMES", "5");
    std::env::set_var("WEIBO_SEARCH__SEARCH__REGION", "江苏,上海");
    let settings = Settings::load(Some(file.path()));
    std::env::remove_var("WEIBO_SEARCH__HTTP__RETRY_TIMES");
    std::env::remove_var("WEIBO_SEARCH__SEARCH__REGION");

    let settings = settings.unwrap();
    assert_eq!(settings.search.keyword_list, vec!["文件关键词"]);
    assert_eq!(settings.search.limit_result, 7);
    assert_eq!(settings.http.retry_times, 5);
    assert_eq!(settings.search.region, vec!["江苏", "上海"]);
}
