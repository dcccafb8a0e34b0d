// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::SearchError;
use std::path::{Path, PathBuf};

/// 从文件读取关键词列表
///
/// 相对路径以当前工作目录为基准；文件须为 UTF-8 编码（可带 BOM），每个非空行是一个关键词
pub fn load_keyword_file(file: &str) -> Result<Vec<String>, SearchError> {
    let path = resolve_path(file)?;
    if !path.is_file() {
        return Err(SearchError::KeywordFileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(&path)?;
    let content = String::from_utf8(bytes)
        .map_err(|_| SearchError::KeywordFileEncoding(path.display().to_string()))?;

    Ok(parse_keywords(&content))
}

/// 将多行文本拆成关键词，去掉 BOM、首尾空白和空行
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_path(file: &str) -> Result<PathBuf, SearchError> {
    let path = Path::new(file);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_keywords() {
        let keywords = parse_keywords("\u{feff}东南大学\r\n\n  南京大学 东南大学  \n");
        assert_eq!(keywords, vec!["东南大学", "南京大学 东南大学"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_keyword_file("/definitely/not/here/keyword_list.txt").unwrap_err();
        assert!(matches!(err, SearchError::KeywordFileNotFound(_)));
    }

    #[test]
    fn test_non_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "东南" in GBK
        file.write_all(&[0xb6, 0xab, 0xc4, 0xcf]).unwrap();

        let err = load_keyword_file(&file.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, SearchError::KeywordFileEncoding(_)));
    }
}
