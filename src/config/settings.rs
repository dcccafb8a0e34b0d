// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 默认请求头中的浏览器标识
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 应用程序配置设置
///
/// 包含本地服务器、搜索条件、HTTP下载和结果输出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 本地网页服务配置
    pub server: ServerSettings,
    /// 搜索条件配置
    pub search: SearchSettings,
    /// HTTP下载配置
    pub http: HttpSettings,
    /// 结果输出配置
    pub pipelines: PipelineSettings,
}

/// 本地网页服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 监听主机地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 启动后是否自动打开浏览器
    pub open_browser: bool,
}

/// 搜索条件配置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// 要搜索的关键词列表，一行中以空格分隔的多个词表示同时包含
    pub keyword_list: Vec<String>,
    /// 关键词文件路径，设置后覆盖 keyword_list，每行一个关键词
    pub keyword_file: Option<String>,
    /// 微博类型 (0-6)
    pub weibo_type: u8,
    /// 必需包含的内容 (0-4)
    pub contain_type: u8,
    /// 发布地区，省或直辖市名称，"全部" 表示不筛选
    pub region: Vec<String>,
    /// 起始日期 yyyy-mm-dd，缺省为今天
    pub start_date: Option<String>,
    /// 终止日期 yyyy-mm-dd，缺省为今天
    pub end_date: Option<String>,
    /// 结果页数达到该值时细分搜索条件
    pub further_threshold: usize,
    /// 结果数量限制，0 表示不限制
    pub limit_result: usize,
    /// 搜索站点地址
    pub base_url: String,
    /// 是否查询每条微博的发布IP属地
    pub fetch_ip_location: bool,
    /// IP属地查询接口地址
    pub ip_api_base: String,
}

/// HTTP下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 两次请求之间的等待时间（秒）
    pub download_delay_secs: f64,
    /// 是否在 0.5 到 1.5 倍之间随机化等待时间
    pub randomize_download_delay: bool,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 失败请求的最大重试次数
    pub retry_times: u32,
    /// User-Agent
    pub user_agent: String,
    /// Accept 请求头
    pub accept: String,
    /// Accept-Language 请求头
    pub accept_language: String,
    /// 登录后的 Cookie
    pub cookie: Option<String>,
}

/// 结果输出配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 结果根目录
    pub output_dir: String,
    /// 是否写入 CSV 文件
    pub csv: bool,
    /// SQLite 数据库文件路径，不设置则不写入
    pub sqlite_database: Option<String>,
    /// 是否下载微博图片
    pub download_images: bool,
    /// 是否下载微博视频
    pub download_videos: bool,
    /// 图片存储根路径
    pub images_store: String,
    /// 视频存储根路径
    pub files_store: String,
}

impl Settings {
    /// 加载配置，可额外指定一个配置文件
    ///
    /// 依次叠加内置默认值、config 目录下的配置文件、显式指定的文件以及 WEIBO_SEARCH 前缀的环境变量。
    /// 显式指定的文件必须存在
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("WEIBO_SEARCH")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("search.keyword_list")
                    .with_list_parse_key("search.region"),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Server
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8080)?
            .set_default("server.open_browser", true)?
            // Search
            .set_default("search.keyword_list", vec!["东南大学"])?
            .set_default("search.weibo_type", 1)?
            .set_default("search.contain_type", 0)?
            .set_default("search.region", vec!["全部"])?
            .set_default("search.further_threshold", 46)?
            .set_default("search.limit_result", 0)?
            .set_default("search.base_url", "https://s.weibo.com")?
            .set_default("search.fetch_ip_location", true)?
            .set_default("search.ip_api_base", "https://weibo.com")?
            // HTTP
            .set_default("http.download_delay_secs", 10.0)?
            .set_default("http.randomize_download_delay", true)?
            .set_default("http.timeout_secs", 30)?
            .set_default("http.retry_times", 2)?
            .set_default("http.user_agent", DEFAULT_USER_AGENT)?
            .set_default(
                "http.accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )?
            .set_default("http.accept_language", "zh-CN,zh;q=0.9,en;q=0.8,en-US;q=0.7")?
            // Pipelines
            .set_default("pipelines.output_dir", "结果文件")?
            .set_default("pipelines.csv", true)?
            .set_default("pipelines.download_images", false)?
            .set_default("pipelines.download_videos", false)?
            .set_default("pipelines.images_store", "./")?
            .set_default("pipelines.files_store", "./")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
